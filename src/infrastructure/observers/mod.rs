pub mod tracing_observer;
