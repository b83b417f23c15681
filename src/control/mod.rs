//! Motion control: the spring-damper smoother that animates the indicator.

pub mod spring;
