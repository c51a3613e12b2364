// RingQueue - 呼び出し側に公開するハンドル
// 内部状態には触れず、アービトレーターへの要求送信だけを行う

use super::arbitrator::{Arbitrator, DequeueRequest, EnqueueRequest, QueuePhase, QueueStatus};
use super::ring::RingBuffer;
use crate::core::{PipelineError, PipelineResult};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::trace;

/// 同時に滞留できる取り出し要求の数
const DEQUEUE_BACKLOG: usize = 64;

/// 単一アービトレーターによる有界FIFOキュー
///
/// 1つのProducerとN個のConsumerで`Arc<RingQueue<T>>`を共有して使う。
///
/// - `enqueue`: 空きができるまで待機。停止後は何もせずレコードを破棄する
/// - `try_dequeue`: レコードを待たない。空なら停止状態に関係なく`None`
/// - `stop`: 以後の投入を禁止。バッファ済みのレコードは排出される
///
/// `stop`は最後の`enqueue`が完了してから呼ぶこと。停止後の投入は
/// 報告されずに捨てられる。
pub struct RingQueue<T> {
    enqueue_tx: mpsc::Sender<EnqueueRequest<T>>,
    dequeue_tx: mpsc::Sender<DequeueRequest<T>>,
    stop_tx: mpsc::Sender<()>,
    status_rx: watch::Receiver<QueueStatus>,
    stopped: AtomicBool,
    capacity: usize,
}

impl<T: Send + 'static> RingQueue<T> {
    /// 容量`capacity`のキューを作成し、アービトレーターを起動する
    ///
    /// # Panics
    /// Tokioランタイムの外で呼ぶとパニックする
    pub fn new(capacity: usize) -> PipelineResult<Self> {
        if capacity == 0 {
            return Err(PipelineError::validation(
                "buffer_size",
                "1以上である必要があります",
            ));
        }

        let (enqueue_tx, enqueue_rx) = mpsc::channel(1);
        let (dequeue_tx, dequeue_rx) = mpsc::channel(DEQUEUE_BACKLOG);
        let (stop_tx, stop_rx) = mpsc::channel(1);
        let (status_tx, status_rx) = watch::channel(QueueStatus::new(capacity));

        let arbitrator = Arbitrator::new(
            RingBuffer::with_capacity(capacity),
            enqueue_rx,
            dequeue_rx,
            stop_rx,
            status_tx,
        );
        tokio::spawn(arbitrator.run());

        Ok(Self {
            enqueue_tx,
            dequeue_tx,
            stop_tx,
            status_rx,
            stopped: AtomicBool::new(false),
            capacity,
        })
    }

    /// レコードを投入する。満杯の間は待機し、リングに格納された時点で戻る
    ///
    /// 受理前にこのFutureを破棄した場合、レコードは投入されない。
    pub async fn enqueue(&self, record: T) {
        if self.stopped.load(Ordering::Acquire) {
            trace!("enqueue after stop dropped");
            return;
        }

        let (accepted, accepted_rx) = oneshot::channel();
        if self
            .enqueue_tx
            .send(EnqueueRequest { record, accepted })
            .await
            .is_err()
        {
            trace!("enqueue after stop dropped");
            return;
        }

        // 停止で要求が破棄された場合もここで戻る
        let _ = accepted_rx.await;
    }

    /// レコードがあれば先頭を取り出す。レコードの到着は待たない
    pub async fn try_dequeue(&self) -> Option<T> {
        self.request(DequeueRequest::Try).await
    }

    /// レコードが届くまで待って取り出す。排出完了後は`None`
    pub async fn dequeue(&self) -> Option<T> {
        self.request(DequeueRequest::Wait).await
    }

    async fn request(
        &self,
        make: fn(oneshot::Sender<Option<T>>) -> DequeueRequest<T>,
    ) -> Option<T> {
        if self.is_drained() {
            return None;
        }

        let (reply, reply_rx) = oneshot::channel();
        self.dequeue_tx.send(make(reply)).await.ok()?;
        reply_rx.await.ok().flatten()
    }

    /// これ以上投入しないことを通知する。何度呼んでもよい
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        // 容量1のチャンネルなので、既に送信済みなら失敗しても問題ない
        let _ = self.stop_tx.try_send(());
    }
}

impl<T> RingQueue<T> {
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// アービトレーターが最後に公開した状態
    pub fn status(&self) -> QueueStatus {
        *self.status_rx.borrow()
    }

    /// 状態変化の購読。中間の状態は読み飛ばされることがある
    pub fn subscribe(&self) -> watch::Receiver<QueueStatus> {
        self.status_rx.clone()
    }

    /// 停止済みかつ空で、以後レコードが現れないか
    pub fn is_drained(&self) -> bool {
        self.status_rx.borrow().phase == QueuePhase::Drained
    }

    /// 排出完了まで待機する
    pub async fn drained(&self) {
        let mut status_rx = self.status_rx.clone();
        let _ = status_rx
            .wait_for(|status| status.phase == QueuePhase::Drained)
            .await;
    }
}
