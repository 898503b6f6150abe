//! Timing of asynchronous work such as chain requests.

use {
    pin_project_lite::pin_project,
    prometheus::{HistogramTimer, HistogramVec, IntCounterVec},
    std::{
        future::Future,
        pin::Pin,
        task::{Context, Poll},
    },
};

/// Records how long a future takes from its first poll until it completes.
/// Futures dropped before completing are counted separately and do not
/// skew the timings.
pub trait Measure: Sized {
    fn measure(self, label: &str) -> Measurable<Self> {
        Measurable {
            inner: self,
            label: label.to_owned(),
            timer: None,
        }
    }
}

impl<T: Future> Measure for T {}

pin_project! {
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct Measurable<T> {
        #[pin]
        inner: T,
        label: String,
        // Running from the first poll until the inner future completes.
        timer: Option<HistogramTimer>,
    }

    impl<T> PinnedDrop for Measurable<T> {
        fn drop(this: Pin<&mut Self>) {
            let this = this.project();
            if let Some(timer) = this.timer.take() {
                timer.stop_and_discard();
                Metrics::get()
                    .measured_futures_dropped
                    .with_label_values(&[this.label.as_str()])
                    .inc();
            }
        }
    }
}

impl<T: Future> Future for Measurable<T> {
    type Output = T::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        if this.timer.is_none() {
            *this.timer = Some(
                Metrics::get()
                    .measured_future_seconds
                    .with_label_values(&[this.label.as_str()])
                    .start_timer(),
            );
        }
        let result = this.inner.poll(cx);
        if result.is_ready() {
            // Dropping the timer records the execution time.
            *this.timer = None;
        }
        result
    }
}

#[derive(prometheus_metric_storage::MetricStorage)]
struct Metrics {
    /// Time measured futures took to complete.
    #[metric(labels("label"))]
    measured_future_seconds: HistogramVec,

    /// Measured futures dropped before they completed.
    #[metric(labels("label"))]
    measured_futures_dropped: IntCounterVec,
}

impl Metrics {
    fn get() -> &'static Self {
        Metrics::instance(super::metrics::get_storage_registry()).unwrap()
    }
}
