//! 補正テーブル生成のデフォルトパラメータ

/// 目標基本波振幅 M のグリッド（デフォルト値）
pub mod grid {
    /// 開始値
    pub const DEFAULT_M_START: f64 = 0.001;
    /// 終了値（含む）
    pub const DEFAULT_M_STOP: f64 = 0.999;
    /// 刻み幅（ファームウェア側のテーブルインデックスは (M - M0) * 1000）
    pub const DEFAULT_M_STEP: f64 = 0.001;

    /// 初期値スイープの開始値
    pub const DEFAULT_GUESS_START: f64 = 1.0;
    /// 初期値スイープの終了値（含む）
    pub const DEFAULT_GUESS_STOP: f64 = 50.0;
    /// 初期値スイープの刻み幅
    pub const DEFAULT_GUESS_STEP: f64 = 0.01;

    /// 1つのグリッドに許す点数の上限
    pub const MAX_POINTS: usize = 100_000_000;
}

/// 過変調境界探索（1/4周期での最大値探索）
pub mod minimizer {
    /// x方向の絶対許容誤差
    pub const DEFAULT_XATOL: f64 = 1e-8;
    /// 最大反復回数
    pub const DEFAULT_MAX_ITERATIONS: usize = 500;
}

/// 基本波成分の適応求積
pub mod quadrature {
    /// 絶対許容誤差
    pub const DEFAULT_EPS_ABS: f64 = 1e-11;
    /// 相対許容誤差
    pub const DEFAULT_EPS_REL: f64 = 1e-11;
    /// 最大分割区間数
    pub const DEFAULT_LIMIT: usize = 1000;
}

/// 非線形方程式ソルバ（初期値ごとのセカント法）
pub mod solver {
    /// 連続する反復値の相対許容誤差
    pub const DEFAULT_XTOL: f64 = 1.49012e-8;
    /// 初期値1つあたりの残差評価回数の上限
    pub const DEFAULT_MAX_EVALUATIONS: usize = 200;
    /// 下限を越えた反復を半分に戻す処理の連続許容回数
    pub const DEFAULT_MAX_DAMPED_STEPS: usize = 2;
}

/// 8bit量子化
pub mod quantize {
    /// 最大補正値に割り当てるコード
    pub const CODE_FULL_SCALE: f64 = 255.0;
}

/// ファームウェア用波形LUT
pub mod lut {
    /// 1周期あたりのサンプル数
    pub const DEFAULT_LENGTH: usize = 256;
    /// 振幅（int16へのスケーリング係数）
    pub const DEFAULT_AMPLITUDE: f64 = 128.0;
}

/// C言語配列出力
pub mod c_array {
    /// 補正テーブルのデータ型
    pub const TABLE_DATA_TYPE: &str = "const uint8_t";
    /// 波形LUTのデータ型
    pub const LUT_DATA_TYPE: &str = "const int16_t";
    /// 1行あたりの要素数
    pub const DEFAULT_ITEMS_PER_LINE: usize = 16;
}

/// CSV出力ファイル名（デフォルト値）
pub const DEFAULT_OUTPUT_PATH: &str = "output.csv";
