pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod events;
pub mod repository;
pub mod service;
