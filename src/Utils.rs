/// terminal logger set-up for binaries and examples
pub mod logger;
