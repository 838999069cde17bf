mod attendance;
mod health_test;
mod insights_test;
mod registry_test;
