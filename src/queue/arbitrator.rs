// アービトレーター - キュー状態の唯一の所有者
// 投入・取り出し・停止の要求をチャンネル経由で受け取り、1タスクで直列化する

use super::ring::RingBuffer;
use std::collections::VecDeque;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, trace};

/// キューのライフサイクル段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueuePhase {
    /// 投入を受け付けている
    Accepting,
    /// 停止済み。残りを排出中
    Draining,
    /// 停止済みかつ空。以後レコードは現れない
    Drained,
}

/// アービトレーターが公開するキューの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStatus {
    pub phase: QueuePhase,
    pub buffered: usize,
    pub capacity: usize,
}

impl QueueStatus {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            phase: QueuePhase::Accepting,
            buffered: 0,
            capacity,
        }
    }
}

/// 投入要求。`accepted`はリングに格納された時点で通知される
pub(crate) struct EnqueueRequest<T> {
    pub(crate) record: T,
    pub(crate) accepted: oneshot::Sender<()>,
}

/// 取り出し要求
pub(crate) enum DequeueRequest<T> {
    /// 空なら即座に`None`を返す
    Try(oneshot::Sender<Option<T>>),
    /// 空ならレコード到着か排出完了まで保留する
    Wait(oneshot::Sender<Option<T>>),
}

pub(crate) struct Arbitrator<T> {
    ring: RingBuffer<T>,
    enqueue_rx: mpsc::Receiver<EnqueueRequest<T>>,
    dequeue_rx: mpsc::Receiver<DequeueRequest<T>>,
    stop_rx: mpsc::Receiver<()>,
    // リングが空のときだけ要素を持つ
    waiters: VecDeque<oneshot::Sender<Option<T>>>,
    status_tx: watch::Sender<QueueStatus>,
    stopped: bool,
}

impl<T: Send + 'static> Arbitrator<T> {
    pub(crate) fn new(
        ring: RingBuffer<T>,
        enqueue_rx: mpsc::Receiver<EnqueueRequest<T>>,
        dequeue_rx: mpsc::Receiver<DequeueRequest<T>>,
        stop_rx: mpsc::Receiver<()>,
        status_tx: watch::Sender<QueueStatus>,
    ) -> Self {
        Self {
            ring,
            enqueue_rx,
            dequeue_rx,
            stop_rx,
            waiters: VecDeque::new(),
            status_tx,
            stopped: false,
        }
    }

    /// 停止かつ排出完了、または全ハンドルが破棄されるまで要求を処理する
    pub(crate) async fn run(mut self) {
        debug!(capacity = self.ring.capacity(), "arbitrator started");

        loop {
            if self.stopped && self.ring.is_empty() {
                self.finish();
                return;
            }

            let accepting = !self.stopped && !self.ring.is_full();
            let stoppable = !self.stopped;

            tokio::select! {
                Some(request) = self.enqueue_rx.recv(), if accepting => self.accept(request),
                Some(request) = self.dequeue_rx.recv() => self.serve(request),
                Some(()) = self.stop_rx.recv(), if stoppable => self.begin_stop(),
                else => {
                    debug!(
                        buffered = self.ring.len(),
                        "all queue handles dropped, arbitrator exiting"
                    );
                    return;
                }
            }

            self.publish();
        }
    }

    fn accept(&mut self, request: EnqueueRequest<T>) {
        let EnqueueRequest { record, accepted } = request;

        // 受理前に呼び出し側がキャンセルした投入は取り込まない
        if accepted.is_closed() {
            trace!("enqueue cancelled before acceptance");
            return;
        }

        let mut pending = Some(record);
        if self.ring.is_empty() {
            while let Some(waiter) = self.waiters.pop_front() {
                match waiter.send(pending.take()) {
                    Ok(()) => break,
                    Err(returned) => pending = returned,
                }
            }
        }

        if let Some(record) = pending {
            let pushed = self.ring.push_back(record);
            debug_assert!(pushed.is_ok(), "enqueue accepted while ring was full");
        }

        let _ = accepted.send(());
    }

    fn serve(&mut self, request: DequeueRequest<T>) {
        match request {
            DequeueRequest::Try(reply) => self.reply_with_head(reply),
            DequeueRequest::Wait(reply) if self.ring.is_empty() => self.waiters.push_back(reply),
            DequeueRequest::Wait(reply) => self.reply_with_head(reply),
        }
    }

    fn reply_with_head(&mut self, reply: oneshot::Sender<Option<T>>) {
        let head = self.ring.pop_front();
        if let Err(Some(record)) = reply.send(head) {
            // 要求側が既にいない。順序を保ったまま先頭に戻す
            let restored = self.ring.push_front(record);
            debug_assert!(restored.is_ok(), "slot freed by pop must be reusable");
        }
    }

    fn begin_stop(&mut self) {
        self.stopped = true;
        self.enqueue_rx.close();

        let mut dropped = 0usize;
        while let Ok(request) = self.enqueue_rx.try_recv() {
            drop(request);
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, "enqueue requests dropped after stop");
        }

        debug!(buffered = self.ring.len(), "stop received, draining");
    }

    fn finish(&mut self) {
        for waiter in self.waiters.drain(..) {
            let _ = waiter.send(None);
        }

        self.status_tx.send_replace(QueueStatus {
            phase: QueuePhase::Drained,
            buffered: 0,
            capacity: self.ring.capacity(),
        });
        debug!("queue drained, arbitrator exiting");
    }

    fn publish(&self) {
        let status = QueueStatus {
            phase: if self.stopped {
                QueuePhase::Draining
            } else {
                QueuePhase::Accepting
            },
            buffered: self.ring.len(),
            capacity: self.ring.capacity(),
        };

        self.status_tx.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }
}
