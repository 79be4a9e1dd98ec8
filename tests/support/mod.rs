#![allow(dead_code)]

pub mod fake_payment_processor;
pub mod processor_server;
pub mod redis_container;
