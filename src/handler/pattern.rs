use std::fmt;

use log::debug;
use regex::Regex;

#[cfg(debug_assertions)]
use log::warn;
#[cfg(debug_assertions)]
use std::time::{Duration, Instant};

use crate::error::Error;

/// 1つのパスセグメント（スラッシュを含まない）を表すプレースホルダー
pub const PLACEHOLDER: char = '_';

/// プレースホルダーを置き換える正規表現
const SEGMENT_REGEX: &str = "([^/]+)";

/// コンパイル済みURLパターン
///
/// テンプレート中の `_` は1セグメントにマッチし、それ以外の文字は
/// すべてリテラルとして扱われる。マッチは常にパス全体に対して行う。
#[derive(Clone)]
pub struct Pattern {
    template: String,
    regex: Regex,
}

impl Pattern {
    /// テンプレートからパターンをコンパイル
    pub fn compile(template: impl Into<String>) -> Result<Self, Error> {
        let template = template.into();
        let body = template
            .split(PLACEHOLDER)
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(SEGMENT_REGEX);
        let source = format!("^{}$", body);

        let regex = Regex::new(&source)
            .map_err(|e| Error::InvalidPattern(format!("{}: {}", template, e)))?;

        Ok(Self { template, regex })
    }

    /// 元のテンプレート文字列
    pub fn template(&self) -> &str {
        &self.template
    }

    /// コンパイル後の正規表現文字列
    pub fn as_regex_str(&self) -> &str {
        self.regex.as_str()
    }

    /// プレースホルダーの数
    pub fn placeholder_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// パスにマッチすればキャプチャをテンプレート順に返す
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        #[cfg(debug_assertions)]
        let start_time = Instant::now();

        let captures = self.regex.captures(path).map(|caps| {
            caps.iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect::<Vec<_>>()
        });

        // デバッグビルド時のみ処理時間を監視
        #[cfg(debug_assertions)]
        {
            let elapsed = start_time.elapsed();
            if elapsed > Duration::from_millis(100) {
                warn!(
                    "Slow pattern matching detected: pattern '{}' took {:?} for path '{}'",
                    self.template, elapsed, path
                );
            }
        }

        debug!(
            "Path matching: {} against pattern {}: {}",
            path,
            self.template,
            captures.is_some()
        );
        captures
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("template", &self.template)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template
    }
}

impl Eq for Pattern {}
