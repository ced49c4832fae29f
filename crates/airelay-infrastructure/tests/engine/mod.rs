//! End-to-end engine scenarios over scripted providers

mod orchestrator_test;
mod queue_test;
mod support;
