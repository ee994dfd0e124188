pub mod controller_loop;
pub mod telemetry_loop;
