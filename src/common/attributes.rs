//! 属性ストアの実装（拡張機能がリクエストやアプリケーションに値を付与するために使う）

use std::any::Any;
use std::collections::HashMap;

/// 文字列キーで任意の型の値を保持するストア
#[derive(Debug, Default)]
pub struct Attributes {
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Attributes {
    /// 新しいAttributesを作成
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// 値を設定（同じキーは上書き）
    pub fn set<T: Send + Sync + 'static>(&mut self, key: &str, value: T) {
        self.values.insert(key.to_string(), Box::new(value));
    }

    /// 値を取得（型が一致しない場合はNone）
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.values
            .get(key)
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// 値の可変参照を取得
    pub fn get_mut<T: 'static>(&mut self, key: &str) -> Option<&mut T> {
        self.values
            .get_mut(key)
            .and_then(|boxed| boxed.downcast_mut::<T>())
    }

    /// 値を削除して返却
    pub fn remove<T: 'static>(&mut self, key: &str) -> Option<T> {
        self.values
            .remove(key)
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// 指定されたキーが存在するかチェック
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Clone for Attributes {
    fn clone(&self) -> Self {
        // Anyはcloneできないため、複製時は空になる
        Self::new()
    }
}
