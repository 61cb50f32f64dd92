// ABOUTME: Integration tests for watched reads and their refetch triggers
// ABOUTME: Loading then success, refetch on invalidation, focus and interval
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::harness;
use futures_util::StreamExt;
use recruit_query::envelope::ResponseEnvelope;
use recruit_query::orchestrator::{MutationConfig, MutationInput, ReadConfig};
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;

const STEP: Duration = Duration::from_secs(2);

#[tokio::test]
async fn test_watch_emits_loading_then_data() -> Result<()> {
    let h = harness();
    h.transport.push_ok(ResponseEnvelope::ok(json!(["first"])));
    let mut stream = h.orchestrator.watch(ReadConfig::new("/feed", "feed"));

    let first = timeout(STEP, stream.next()).await?.unwrap();
    assert!(first.is_loading());

    let second = timeout(STEP, stream.next()).await?.unwrap();
    assert!(second.is_success());
    assert_eq!(second.data().unwrap().payload, json!(["first"]));
    Ok(())
}

#[tokio::test]
async fn test_watch_serves_fresh_cache_without_fetching() -> Result<()> {
    let h = harness();
    let read = ReadConfig::new("/feed", "feed");
    h.orchestrator.read(&read, None).await?;

    let mut stream = h.orchestrator.watch(read);
    let first = timeout(STEP, stream.next()).await?.unwrap();
    assert!(first.is_success());
    assert!(!first.is_stale());
    assert_eq!(h.transport.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_watch_refetches_after_mutation_invalidates_key() -> Result<()> {
    let h = harness();
    h.transport.push_ok(ResponseEnvelope::ok(json!(1)));
    h.transport.push_ok(ResponseEnvelope::ok(json!({"created": true})));
    h.transport.push_ok(ResponseEnvelope::ok(json!(2)));
    let mut stream = h.orchestrator.watch(ReadConfig::new("/posts", "posts"));

    timeout(STEP, stream.next()).await?.unwrap();
    let loaded = timeout(STEP, stream.next()).await?.unwrap();
    assert_eq!(loaded.data().unwrap().payload, json!(1));

    h.orchestrator
        .create(
            &MutationConfig::for_resource("/posts").invalidate("posts"),
            MutationInput::default(),
            None,
        )
        .await?;

    let refreshed = timeout(STEP, stream.next()).await?.unwrap();
    assert_eq!(refreshed.data().unwrap().payload, json!(2));
    assert_eq!(h.transport.call_count(), 3);
    Ok(())
}

#[tokio::test]
async fn test_watch_refetches_on_focus_when_enabled() -> Result<()> {
    let h = harness();
    let mut stream = h
        .orchestrator
        .watch(ReadConfig::new("/feed", "feed").refetch_on_focus(true));
    timeout(STEP, stream.next()).await?.unwrap();
    timeout(STEP, stream.next()).await?.unwrap();

    h.orchestrator.notify_focus();
    let refreshed = timeout(STEP, stream.next()).await?.unwrap();
    assert!(refreshed.is_success());
    assert_eq!(h.transport.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_watch_ignores_focus_by_default() -> Result<()> {
    let h = harness();
    let mut stream = h.orchestrator.watch(ReadConfig::new("/feed", "feed"));
    timeout(STEP, stream.next()).await?.unwrap();
    timeout(STEP, stream.next()).await?.unwrap();

    h.orchestrator.notify_focus();
    assert!(timeout(Duration::from_millis(200), stream.next())
        .await
        .is_err());
    assert_eq!(h.transport.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_watch_refetches_on_interval() -> Result<()> {
    let h = harness();
    let mut stream = h.orchestrator.watch(
        ReadConfig::new("/scores", "scores").refetch_interval(Duration::from_millis(50)),
    );
    timeout(STEP, stream.next()).await?.unwrap();
    timeout(STEP, stream.next()).await?.unwrap();

    let refreshed = timeout(STEP, stream.next()).await?.unwrap();
    assert!(refreshed.is_success());
    assert!(h.transport.call_count() >= 2);
    Ok(())
}
