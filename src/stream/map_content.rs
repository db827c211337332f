//! Content mapping over event streams

use futures::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::Result;
use crate::types::StreamEvent;

pin_project! {
    /// A stream combinator that transforms frame content, leaving timing,
    /// numbering and `Start` events untouched
    pub struct MapContent<S, F> {
        #[pin]
        stream: S,
        f: F,
    }
}

impl<S, F> MapContent<S, F> {
    pub fn new(stream: S, f: F) -> Self {
        Self { stream, f }
    }
}

impl<S, F, C, D> Stream for MapContent<S, F>
where
    S: Stream<Item = Result<StreamEvent<C>>>,
    F: FnMut(C) -> D,
{
    type Item = Result<StreamEvent<D>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let f = this.f;
        this.stream.poll_next(cx).map(|item| item.map(|result| result.map(|event| event.map_content(f))))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stream.size_hint()
    }
}
