// Each domain contains: mod.rs, resolvers.rs, service.rs, types.rs

pub mod results;
pub mod rosters;
pub mod schedule;
pub mod standings;
