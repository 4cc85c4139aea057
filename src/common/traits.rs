//! コアトレイト定義（Extension）

use super::http::{Request, Response};
use crate::error::Error;
use crate::Application;

/// ディスパッチの前後に割り込む拡張機能
///
/// 3つのフックはいずれも既定で何もしない。登録順に呼び出され、
/// `before`/`after` はルートに一致したリクエストに対してのみ実行される。
pub trait Extension: Send + Sync {
    /// アプリケーション構築時に一度だけ呼ばれる（ルート登録後）
    fn setup(&self, _app: &mut Application) {}

    /// ハンドラー呼び出し前の処理
    fn before(&self, _req: &mut Request) -> Result<(), Error> {
        Ok(())
    }

    /// ハンドラー呼び出し後の処理
    fn after(&self, _req: &mut Request, _res: &mut Response) -> Result<(), Error> {
        Ok(())
    }
}
