mod concurrency;
mod failures;
mod http;
mod records;
mod sealing;
mod sync;
mod tampering;
