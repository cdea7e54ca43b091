use crate::config::DriftConfig;
use crate::drift::find_concept_drift;
use crate::error::ConfigError;
use crate::fptree::FpTree;
use crate::item::Item;
use crate::window::{AdaptiveWindow, TransactionWindow};
use std::hash::Hash;
use std::marker::PhantomData;
use tracing::debug;

/// Summary emitted after a confirmed drift.
#[derive(Debug, Clone)]
pub struct Detection<T> {
    /// Tree over the post-change segment that survived pruning.
    pub tree: FpTree<T>,
    /// Number of input transactions consumed, including the one that
    /// triggered this detection.
    pub transactions_consumed: usize,
    /// Mean transaction length in `tree`.
    pub avg_path_len: f64,
}

/// Push-based drift detector.
///
/// Owns the window for one stream. Each call to [`DriftDetector::push`]
/// advances the stream by one transaction; detection only runs when the
/// window reports a bucket boundary.
#[derive(Debug, Clone)]
pub struct DriftDetector<T, W = AdaptiveWindow<T>> {
    window: W,
    min_cut_len: usize,
    local_cut_confidence: f64,
    transactions_consumed: usize,
    _item: PhantomData<T>,
}

impl<T: Hash + Eq + Ord + Clone> DriftDetector<T> {
    /// Creates a detector over an [`AdaptiveWindow`] built from `config`.
    ///
    /// # Panics
    ///
    /// The returned detector panics on [`push`](Self::push) if a boundary
    /// check meets a concentration bound above 1. A small `min_cut_len`
    /// combined with a strict `local_cut_confidence` reaches that bound:
    /// with `window_len = 10`, `min_cut_len = 10` and a confidence of
    /// `1e-10`, a 10/10 split gives a bound near 3.3.
    pub fn new(config: &DriftConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::with_window(
            AdaptiveWindow::new(config.window_len, config.merge_threshold),
            config.min_cut_len,
            config.local_cut_confidence,
        )
    }
}

impl<T, W> DriftDetector<T, W>
where
    T: Hash + Eq + Ord + Clone,
    W: TransactionWindow<T>,
{
    /// Creates a detector over a caller-supplied window.
    ///
    /// # Panics
    ///
    /// As with [`DriftDetector::new`], pushing later panics if a short
    /// `min_cut_len` and a strict `local_cut_confidence` drive the bound
    /// above 1.
    pub fn with_window(
        window: W,
        min_cut_len: usize,
        local_cut_confidence: f64,
    ) -> Result<Self, ConfigError> {
        if !(local_cut_confidence > 0.0 && local_cut_confidence <= 1.0) {
            return Err(ConfigError::InvalidConfidence(local_cut_confidence));
        }
        if min_cut_len == 0 {
            return Err(ConfigError::ZeroMinCutLen);
        }
        Ok(Self {
            window,
            min_cut_len,
            local_cut_confidence,
            transactions_consumed: 0,
            _item: PhantomData,
        })
    }

    /// Feeds one transaction.
    ///
    /// Returns a [`Detection`] if this transaction closed a bucket and the
    /// window now shows a significant change. The buckets before the cut
    /// are dropped in that case.
    ///
    /// # Panics
    ///
    /// Panics with `epsilon out of range` if a candidate split has so few
    /// transactions, for the configured confidence, that the bound exceeds 1.
    pub fn push<I: IntoIterator<Item = T>>(&mut self, transaction: I) -> Option<Detection<T>> {
        self.transactions_consumed += 1;

        let items: Vec<Item<T>> = transaction.into_iter().map(Item::new).collect();
        if !self.window.add(items) {
            return None;
        }

        debug!(
            buckets = self.window.len(),
            transactions_consumed = self.transactions_consumed,
            "bucket boundary, checking for drift"
        );
        let cut = find_concept_drift(
            self.window.buckets(),
            self.min_cut_len,
            self.local_cut_confidence,
        )?;

        self.window.remove_prefix(cut.cut_index);
        debug!(
            dropped = cut.cut_index,
            remaining = self.window.len(),
            "pruned stale buckets"
        );

        Some(Detection {
            tree: cut.tree,
            transactions_consumed: self.transactions_consumed,
            avg_path_len: cut.avg_path_len,
        })
    }

    /// Number of transactions pushed so far.
    pub fn transactions_consumed(&self) -> usize {
        self.transactions_consumed
    }

    /// The window backing this detector.
    pub fn window(&self) -> &W {
        &self.window
    }
}

/// Lazy stream of detections over an input iterator.
///
/// Input is pulled only as far as needed to produce the next detection.
/// The stream cannot be rewound; dropping it cancels detection.
pub struct DriftStream<I, T, W = AdaptiveWindow<T>> {
    transactions: I,
    detector: DriftDetector<T, W>,
}

impl<I, T> DriftStream<I, T>
where
    I: Iterator,
    I::Item: IntoIterator<Item = T>,
    T: Hash + Eq + Ord + Clone,
{
    /// Wraps `transactions` with a detector built from `config`.
    pub fn new<S>(transactions: S, config: &DriftConfig) -> Result<Self, ConfigError>
    where
        S: IntoIterator<IntoIter = I>,
    {
        Ok(Self::with_detector(
            transactions,
            DriftDetector::new(config)?,
        ))
    }
}

impl<I, T, W> DriftStream<I, T, W>
where
    I: Iterator,
    I::Item: IntoIterator<Item = T>,
    T: Hash + Eq + Ord + Clone,
    W: TransactionWindow<T>,
{
    /// Wraps `transactions` with an existing detector.
    pub fn with_detector<S>(transactions: S, detector: DriftDetector<T, W>) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            transactions: transactions.into_iter(),
            detector,
        }
    }

    /// The underlying detector.
    pub fn detector(&self) -> &DriftDetector<T, W> {
        &self.detector
    }
}

impl<I, T, W> Iterator for DriftStream<I, T, W>
where
    I: Iterator,
    I::Item: IntoIterator<Item = T>,
    T: Hash + Eq + Ord + Clone,
    W: TransactionWindow<T>,
{
    type Item = Detection<T>;

    fn next(&mut self) -> Option<Self::Item> {
        for transaction in self.transactions.by_ref() {
            if let Some(detection) = self.detector.push(transaction) {
                return Some(detection);
            }
        }
        None
    }
}

/// Runs drift detection over `transactions` with the given configuration.
///
/// Returns an error if `config` is invalid; otherwise a lazy iterator of
/// [`Detection`]s.
///
/// # Panics
///
/// Iterating panics if a boundary check meets a bound above 1. Valid configs
/// can still get there: a small `min_cut_len` with a strict
/// `local_cut_confidence` (e.g. `window_len = 10`, `min_cut_len = 10`,
/// confidence `1e-10`) gives a bound near 3.3 at the first 10/10 split.
pub fn detect_drift<S, T>(
    transactions: S,
    config: &DriftConfig,
) -> Result<DriftStream<S::IntoIter, T>, ConfigError>
where
    S: IntoIterator,
    S::Item: IntoIterator<Item = T>,
    T: Hash + Eq + Ord + Clone,
{
    DriftStream::new(transactions, config)
}
