pub mod capture_run;
pub mod failure_isolation;
pub mod support;
