//! Integration scenarios for the calendar demo.

mod conversion_test;
mod demo_flow_test;
mod drift_test;
