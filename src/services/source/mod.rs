// レコード入力
// NDJSONファイルを1行ずつ読み、レコードまたはスキップ対象の行を返す

pub mod implementations;

pub use implementations::JsonLinesSource;
