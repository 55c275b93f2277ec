//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random tokens, HMAC-SHA512, SHA-1, Base64)
//! - Password hashing (salted HMAC-SHA512)
//! - Cookie building

pub mod cookie;
pub mod crypto;
pub mod password;
