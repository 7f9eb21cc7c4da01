#![allow(dead_code)]

pub mod dataset;
pub mod tutorscore_env;
