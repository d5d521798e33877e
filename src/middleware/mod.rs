pub mod guard;
pub mod rate_limit;
