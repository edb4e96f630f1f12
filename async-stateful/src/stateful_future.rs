use crate::{AsyncError, AsyncState, CreateOptions};
use pin_project::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A future that tracks its own progress as an [`AsyncState`].
///
/// Starts out submitting; once the inner future completes the state is
/// resolved or rejected with its output, which is then passed through
/// unchanged.
///
/// ## Examples
///
/// ```
/// use async_stateful::{to_stateful, AsyncError};
///
/// async fn example() {
///     let mut fetch = Box::pin(to_stateful(async { Ok::<_, AsyncError>(7) }));
///     assert!(fetch.state().is_pending());
///     let value = fetch.as_mut().await;
///     assert_eq!(value, Ok(7));
///     assert_eq!(fetch.state().value(), Some(&7));
/// }
/// ```
#[pin_project(project = StatefulFutureProj)]
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct StatefulFuture<F, T> {
    #[pin]
    inner: F,
    state: AsyncState<T>,
}

/// Wraps `future` so its progress can be read while it runs.
pub fn to_stateful<F, T>(future: F) -> StatefulFuture<F, T>
where
    F: Future<Output = Result<T, AsyncError>>,
{
    StatefulFuture {
        inner: future,
        state: AsyncState::create(None, CreateOptions::pending()),
    }
}

impl<F, T> StatefulFuture<F, T> {
    pub fn state(&self) -> &AsyncState<T> {
        &self.state
    }
}

impl<F, T> Future for StatefulFuture<F, T>
where
    F: Future<Output = Result<T, AsyncError>>,
    T: Clone,
{
    type Output = Result<T, AsyncError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let StatefulFutureProj { inner, state } = self.project();

        match inner.poll(cx) {
            Poll::Ready(output) => {
                let current = std::mem::take(state);
                *state = match &output {
                    Ok(value) => current.resolve(value.clone()),
                    Err(error) => current.reject(error.clone()),
                };
                Poll::Ready(output)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
