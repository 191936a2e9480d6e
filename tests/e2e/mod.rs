// End-to-end tests for the Gospel Podcast Backend API
//
// Each test gets its own server on an ephemeral port through test-context
// lifecycle hooks. Feeds, speech synthesis and object storage are in-memory
// fakes, so the whole publishing path runs without network access and tests
// can run in parallel.

mod helpers;
mod test_health;
mod test_publish;
mod test_text;
