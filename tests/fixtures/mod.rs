#![allow(dead_code)]

pub mod ctx;
