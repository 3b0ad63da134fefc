pub mod grade_report_test;
pub mod health_test;
