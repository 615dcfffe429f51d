mod sink;

pub use sink::AsyncLogSink;
