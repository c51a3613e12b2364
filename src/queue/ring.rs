// 固定長の循環ストレージ
// アービトレーターだけが所有・更新する。スレッド安全性は持たない。

/// 配列ベースの循環バッファ
///
/// `head == tail`は空と満杯の両方で起こるため、`len`で区別する。
#[derive(Debug)]
pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    /// `capacity`個のスロットを確保する。`capacity`は1以上であること
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be at least 1");
        Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// 末尾に追加。満杯なら値をそのまま返す
    pub fn push_back(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.capacity();
        self.len += 1;
        Ok(())
    }

    /// 先頭を取り出す
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        item
    }

    /// 取り出したが受け渡せなかった値を先頭に戻す
    pub fn push_front(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        self.head = (self.head + self.capacity() - 1) % self.capacity();
        self.slots[self.head] = Some(item);
        self.len += 1;
        Ok(())
    }
}
