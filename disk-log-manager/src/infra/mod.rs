pub mod archiver;
pub mod factory;
pub mod file_selector;
pub mod logging;
pub mod priority;
pub mod telemetry;
#[cfg(test)]
pub mod test_doubles;
pub mod usage_probe;
