use {
    super::ChainReading,
    anyhow::Result,
    std::{sync::Arc, time::Duration},
    tokio::sync::watch,
    tokio_stream::wrappers::WatchStream,
    tracing::Instrument,
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BlockInfo {
    pub number: u64,
}

pub type CurrentBlockWatcher = watch::Receiver<BlockInfo>;

/// Creates a cloneable watcher of the best block.
///
/// The watcher does not yield every block individually. It yields the newest
/// block whenever a poll notices that the block number increased, so blocks
/// produced in quick succession may be skipped.
///
/// Fails if the initial block cannot be fetched. Later polling errors are
/// logged and retried on the next tick.
pub async fn current_block_stream(
    chain: Arc<dyn ChainReading>,
    poll_interval: Duration,
) -> Result<CurrentBlockWatcher> {
    let first_block = BlockInfo {
        number: chain.best_block_number().await?,
    };
    tracing::debug!(number = %first_block.number, "polled block");

    let (sender, receiver) = watch::channel(first_block);
    let update_future = async move {
        let mut previous_block = first_block;
        loop {
            tokio::time::sleep(poll_interval).await;
            let block = match chain.best_block_number().await {
                Ok(number) => BlockInfo { number },
                Err(err) => {
                    tracing::warn!(?err, "failed to get best block");
                    continue;
                }
            };

            if block.number <= previous_block.number {
                continue;
            }

            tracing::debug!(number = %block.number, "noticed a new block");
            if sender.send(block).is_err() {
                tracing::debug!("all block receivers dropped, stopping");
                return;
            }
            previous_block = block;
        }
    };

    tokio::task::spawn(update_future.instrument(tracing::info_span!("current_block_stream")));
    Ok(receiver)
}

pub fn into_stream(receiver: CurrentBlockWatcher) -> WatchStream<BlockInfo> {
    WatchStream::new(receiver)
}
