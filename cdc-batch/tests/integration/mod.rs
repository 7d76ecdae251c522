mod config_test;
mod metrics_test;
mod reclassification_test;
