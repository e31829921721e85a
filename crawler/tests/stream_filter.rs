mod common;

use std::sync::Arc;

use chrono::{Local, NaiveDate, TimeZone};
use common::{page, review, ScriptedSource};
use crawler::filter::{DateFilter, DateWindow};
use crawler::stream::ReviewStream;
use crawler_core::Error;
use pretty_assertions::assert_eq;

async fn drain(stream: &mut ReviewStream) -> Vec<String> {
    let mut ids = Vec::new();
    while let Some(r) = stream.next().await.expect("stream ok") {
        ids.push(r.recommendationid);
    }
    ids
}

#[tokio::test]
async fn stream_yields_exactly_the_reported_total() {
    let source = Arc::new(ScriptedSource::new(vec![
        page(vec![review("r0", 100), review("r1", 200)], "c2", Some(3)),
        page(vec![review("r2", 300)], "c3", None),
    ]));
    let mut stream = ReviewStream::new(source.clone());

    let ids = drain(&mut stream).await;

    assert_eq!(ids, vec!["r0", "r1", "r2"]);
    assert_eq!(stream.total_hint(), Some(3));
    assert_eq!(stream.yielded(), 3);
    // Two pages cover the total; no third fetch is issued.
    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn stream_stops_on_an_empty_page_before_the_total() {
    let source = Arc::new(ScriptedSource::new(vec![
        page(vec![review("r0", 100), review("r1", 200)], "c2", Some(5)),
        page(vec![], "c3", None),
    ]));
    let mut stream = ReviewStream::new(source.clone());

    let ids = drain(&mut stream).await;

    // The collection omitted records; the stream ends instead of refetching.
    assert_eq!(ids, vec!["r0", "r1"]);
    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn stream_requires_the_total_hint_on_the_first_page() {
    let source = Arc::new(ScriptedSource::new(vec![page(
        vec![review("r0", 100)],
        "c2",
        None,
    )]));
    let mut stream = ReviewStream::new(source);

    let err = stream.next().await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn stream_is_exhausted_for_an_empty_collection() {
    let source = Arc::new(ScriptedSource::new(vec![page(vec![], "c2", Some(0))]));
    let mut stream = ReviewStream::new(source.clone());

    assert!(stream.next().await.expect("stream ok").is_none());
    assert!(stream.next().await.expect("stream ok").is_none());
    assert_eq!(source.fetches(), 1);
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn local_ts(s: &str, hour: u32) -> i64 {
    Local
        .from_local_datetime(&date(s).and_hms_opt(hour, 0, 0).unwrap())
        .earliest()
        .unwrap()
        .timestamp()
}

#[tokio::test]
async fn filter_without_a_window_is_the_identity() {
    let source = Arc::new(ScriptedSource::new(vec![page(
        vec![review("r0", 100), review("r1", 200)],
        "c2",
        Some(2),
    )]));
    let mut filter = DateFilter::new(ReviewStream::new(source), None);

    let mut ids = Vec::new();
    while let Some(r) = filter.next().await.expect("filter ok") {
        ids.push(r.recommendationid);
    }

    assert_eq!(ids, vec!["r0", "r1"]);
    assert_eq!(filter.records_seen(), 2);
}

#[tokio::test]
async fn filter_drops_records_outside_the_window_preserving_order() {
    let window = DateWindow::new(date("2021-02-01"), date("2021-03-01")).unwrap();
    let source = Arc::new(ScriptedSource::new(vec![page(
        vec![
            review("jan", local_ts("2021-01-15", 12)),
            review("feb-a", local_ts("2021-02-10", 12)),
            review("mar", local_ts("2021-03-15", 12)),
            review("feb-b", local_ts("2021-02-20", 12)),
        ],
        "c2",
        Some(4),
    )]));
    let mut filter = DateFilter::new(ReviewStream::new(source), Some(window));

    let mut ids = Vec::new();
    while let Some(r) = filter.next().await.expect("filter ok") {
        ids.push(r.recommendationid);
    }

    assert_eq!(ids, vec!["feb-a", "feb-b"]);
    assert_eq!(filter.records_seen(), 4);
}
