//! Prodboard: production-flow Kanban board core.
//!
//! This crate implements the domain core of a board that tracks
//! manufacturing orders through production stages (calendar intake,
//! pre-production, production, done). A UI shell drives it from drag
//! gestures, form submissions and realtime subscription callbacks.
//!
//! # Architecture
//!
//! Prodboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, filesystem)
//!
//! # Modules
//!
//! - [`board`]: Work items, stage classification, reordering and persistence
//! - [`access`]: Membership roles, route guards and single-session sign-in
//! - [`preferences`]: Persisted board layout preferences
//! - [`storage`]: Local durable key/value records
//! - [`docstore`]: Remote realtime document store
//! - [`realtime`]: Subscription handles shared by remote adapters
//! - [`config`]: Environment-driven board configuration
//! - [`bootstrap`]: Composition of configured backends

pub mod access;
pub mod board;
pub mod bootstrap;
pub mod config;
pub mod docstore;
pub mod preferences;
pub mod realtime;
pub mod storage;
