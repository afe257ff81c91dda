use serde::Deserialize;

/// 默认科目满分
pub const DEFAULT_MAX_SCORE: f64 = 100.0;

/// 创建科目请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
    pub class_name: String,
    pub max_score: Option<f64>,
}

/// 更新科目请求
///
/// 分配相关字段（作业数量、每份作业分值）不接受外部写入。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub max_score: Option<f64>,
}
