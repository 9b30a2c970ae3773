//! Server-sent event handlers for the demo streams.
//!
//! ```text
//! GET /api/v1/stream/news              data:{"id":1,"title":"…","timestamp":"…"}
//! GET /api/v1/stream/stocks/{symbol}   data:{"symbol":"…","price":100.3,…}
//! GET /api/v1/stream/combined          data:--- streaming started ---
//! ```
//!
//! News and stock streams run until the client disconnects; the combined
//! stream closes after [`COMBINED_LIMIT`] events.

use std::convert::Infallible;

use actix_web::http::header;
use actix_web::web::Bytes;
use actix_web::{HttpResponse, get, web};
use futures_util::{Stream, StreamExt};
use serde::Serialize;

use crate::domain::streaming::{
    COMBINED_LIMIT, News, StockPrice, combined_stream, news_stream, stock_stream,
};

/// Media type of every stream response.
pub const EVENT_STREAM: &str = "text/event-stream";

/// Frame one payload as an SSE `data:` event.
fn data_frame(payload: &str) -> Bytes {
    Bytes::from(format!("data:{payload}\n\n"))
}

fn json_frame<T: Serialize>(item: &T) -> Result<Bytes, serde_json::Error> {
    serde_json::to_string(item).map(|json| data_frame(&json))
}

fn event_stream<S, E>(frames: S) -> HttpResponse
where
    S: Stream<Item = Result<Bytes, E>> + 'static,
    E: Into<Box<dyn std::error::Error>> + 'static,
{
    HttpResponse::Ok()
        .content_type(EVENT_STREAM)
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(frames)
}

/// One headline per second.
#[utoipa::path(
    get,
    path = "/api/v1/stream/news",
    responses((status = 200, description = "Unbounded news events", body = News, content_type = "text/event-stream")),
    tags = ["streams"],
    operation_id = "streamNews"
)]
#[get("/stream/news")]
pub async fn stream_news() -> HttpResponse {
    event_stream(news_stream().map(|news| json_frame(&news)))
}

/// One price tick for `symbol` every 500 ms.
#[utoipa::path(
    get,
    path = "/api/v1/stream/stocks/{symbol}",
    params(("symbol" = String, Path, description = "Ticker symbol")),
    responses((status = 200, description = "Unbounded price events", body = StockPrice, content_type = "text/event-stream")),
    tags = ["streams"],
    operation_id = "streamStock"
)]
#[get("/stream/stocks/{symbol}")]
pub async fn stream_stock(path: web::Path<String>) -> HttpResponse {
    event_stream(stock_stream(path.into_inner()).map(|tick| json_frame(&tick)))
}

/// Start marker, then news and stock lines by arrival, 20 events in total.
#[utoipa::path(
    get,
    path = "/api/v1/stream/combined",
    responses((status = 200, description = "Bounded text events", body = String, content_type = "text/event-stream")),
    tags = ["streams"],
    operation_id = "streamCombined"
)]
#[get("/stream/combined")]
pub async fn stream_combined() -> HttpResponse {
    event_stream(
        combined_stream()
            .take(COMBINED_LIMIT)
            .map(|line| Ok::<_, Infallible>(data_frame(&line))),
    )
}
