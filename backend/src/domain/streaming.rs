//! Infinite demo streams served over server-sent events.
//!
//! Each stream emits its first element immediately and then one element per
//! period. Consumers bound them with `take`. Timers are created on first
//! poll, so a stream can be built outside the runtime that drives it.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::{Interval, MissedTickBehavior, interval};
use utoipa::ToSchema;

/// Period between news items.
pub const NEWS_PERIOD: Duration = Duration::from_millis(1000);
/// Period between stock ticks.
pub const STOCK_PERIOD: Duration = Duration::from_millis(500);
/// Symbol used by the combined stream's stock feed.
pub const COMBINED_SYMBOL: &str = "KOTL";
/// Number of elements the combined endpoint forwards before closing.
pub const COMBINED_LIMIT: usize = 20;
/// First element of every combined stream.
pub const STREAM_STARTED: &str = "--- streaming started ---";

const STARTING_PRICE: f64 = 100.0;

/// One headline of the news feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct News {
    /// Sequence number starting at 1.
    #[schema(example = 1)]
    pub id: u64,
    /// Headline text.
    #[schema(example = "Breaking news #4821")]
    pub title: String,
    /// Emission time.
    pub timestamp: DateTime<Utc>,
}

/// One tick of a stock's random walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockPrice {
    /// Ticker symbol as requested.
    #[schema(example = "KOTL")]
    pub symbol: String,
    /// Current price.
    #[schema(example = 100.42)]
    pub price: f64,
    /// Emission time.
    pub timestamp: DateTime<Utc>,
}

/// Failure raised by a stream producer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StreamError {
    message: String,
}

impl StreamError {
    /// Build an error with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn ticker(period: Duration) -> Interval {
    let mut ticks = interval(period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticks
}

/// News feed at [`NEWS_PERIOD`].
pub fn news_stream() -> impl Stream<Item = News> + Send + 'static {
    news_stream_every(NEWS_PERIOD)
}

/// News feed emitting one headline per `period`.
pub fn news_stream_every(period: Duration) -> impl Stream<Item = News> + Send + 'static {
    stream::unfold((None, 1_u64), move |(ticks, id): (Option<Interval>, u64)| async move {
        let mut ticks = ticks.unwrap_or_else(|| ticker(period));
        ticks.tick().await;
        let headline = rand::thread_rng().gen_range(1000..=9999);
        let news = News {
            id,
            title: format!("Breaking news #{headline}"),
            timestamp: Utc::now(),
        };
        Some((news, (Some(ticks), id + 1)))
    })
}

/// Stock ticks for `symbol` at [`STOCK_PERIOD`].
pub fn stock_stream(symbol: String) -> impl Stream<Item = StockPrice> + Send + 'static {
    stock_stream_every(symbol, STOCK_PERIOD)
}

/// Stock ticks for `symbol`, one per `period`, walking from 100.0 by steps in `[-1, 1)`.
pub fn stock_stream_every(
    symbol: String,
    period: Duration,
) -> impl Stream<Item = StockPrice> + Send + 'static {
    stream::unfold(
        (None, STARTING_PRICE),
        move |(ticks, price): (Option<Interval>, f64)| {
            let symbol = symbol.clone();
            async move {
                let mut ticks = ticks.unwrap_or_else(|| ticker(period));
                ticks.tick().await;
                let next = price + rand::thread_rng().gen_range(-1.0..1.0);
                let tick = StockPrice {
                    symbol,
                    price: next,
                    timestamp: Utc::now(),
                };
                Some((tick, (Some(ticks), next)))
            }
        },
    )
}

/// Merge news and stock lines behind a start marker.
///
/// Lines arrive in whatever order their producers emit them. The first
/// producer failure becomes a single `error: …` line and ends the stream.
pub fn combine<N, S>(news: N, stocks: S) -> BoxStream<'static, String>
where
    N: Stream<Item = Result<String, StreamError>> + Send + 'static,
    S: Stream<Item = Result<String, StreamError>> + Send + 'static,
{
    let merged = stream::select(news, stocks).scan(false, |failed, item| {
        let line = if *failed {
            None
        } else {
            match item {
                Ok(line) => Some(line),
                Err(error) => {
                    *failed = true;
                    Some(format!("error: {error}"))
                }
            }
        };
        futures_util::future::ready(line)
    });
    stream::once(futures_util::future::ready(STREAM_STARTED.to_owned()))
        .chain(merged)
        .boxed()
}

/// The combined news and [`COMBINED_SYMBOL`] stock feed.
pub fn combined_stream() -> BoxStream<'static, String> {
    let news = news_stream().map(|news| Ok(format!("[news] {}", news.title)));
    let stocks = stock_stream(COMBINED_SYMBOL.to_owned())
        .map(|tick| Ok(format!("[stock] {}: {:.2}", tick.symbol, tick.price)));
    combine(news, stocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const FAST: Duration = Duration::from_millis(5);

    #[rstest]
    #[tokio::test]
    async fn news_ids_increase_from_one() {
        let items: Vec<News> = news_stream_every(FAST).take(3).collect().await;

        let ids: Vec<u64> = items.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(items.iter().all(|n| n.title.starts_with("Breaking news #")));
    }

    #[rstest]
    #[tokio::test]
    async fn stock_walk_moves_at_most_one_per_tick() {
        let ticks: Vec<StockPrice> = stock_stream_every("ACME".to_owned(), FAST)
            .take(10)
            .collect()
            .await;

        let mut previous = STARTING_PRICE;
        for tick in &ticks {
            assert_eq!(tick.symbol, "ACME");
            assert!((tick.price - previous).abs() <= 1.0);
            previous = tick.price;
        }
    }

    #[rstest]
    #[tokio::test]
    async fn combined_starts_with_marker() {
        let first: Vec<String> = combined_stream().take(1).collect().await;
        assert_eq!(first, vec![STREAM_STARTED.to_owned()]);
    }

    #[rstest]
    #[tokio::test]
    async fn combine_emits_error_line_then_ends() {
        let news = stream::iter(vec![
            Ok("[news] one".to_owned()),
            Err(StreamError::new("feed down")),
            Ok("[news] never".to_owned()),
        ]);
        let stocks = stream::pending::<Result<String, StreamError>>();

        let lines: Vec<String> = combine(news, stocks).collect().await;

        assert_eq!(
            lines,
            vec![
                STREAM_STARTED.to_owned(),
                "[news] one".to_owned(),
                "error: feed down".to_owned(),
            ]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn combine_interleaves_both_feeds() {
        let news = news_stream_every(FAST).map(|n| Ok(format!("[news] {}", n.id)));
        let stocks = stock_stream_every("KOTL".to_owned(), FAST)
            .map(|t| Ok(format!("[stock] {}", t.symbol)));

        let lines: Vec<String> = combine(news, stocks).take(COMBINED_LIMIT).collect().await;

        assert_eq!(lines.len(), COMBINED_LIMIT);
        assert!(lines.iter().any(|l| l.starts_with("[news]")));
        assert!(lines.iter().any(|l| l.starts_with("[stock]")));
    }
}
