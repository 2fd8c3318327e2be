/// 新条目的初始难度系数（ease factor）
pub const DEFAULT_EASE: f64 = 2.5;

/// 难度系数下限，调度器对每次复习结果强制执行
pub const MIN_EASE: f64 = 1.3;

/// 复习质量评分上限（0..=5）
pub const MAX_QUALITY: u8 = 5;

/// 质量评分达到此值视为回忆成功
pub const PASS_QUALITY: u8 = 3;

/// 第一次成功回忆后的间隔（天）
pub const FIRST_PASS_INTERVAL_DAYS: u32 = 1;

/// 连续第二次成功回忆后的间隔（天）
pub const SECOND_PASS_INTERVAL_DAYS: u32 = 6;

/// 回忆失败后的间隔（天）
pub const FAILED_INTERVAL_DAYS: u32 = 1;

/// 间隔上限（天），避免日期溢出
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// 掌握度分级阈值（天）
pub const FAMILIAR_INTERVAL_DAYS: u32 = 7;
pub const MASTERED_INTERVAL_DAYS: u32 = 21;
pub const MASTERED_MIN_REPETITIONS: u32 = 3;

/// 每道选择题的选项数量（1 个正确答案 + 3 个干扰项）
pub const OPTIONS_PER_QUESTION: usize = 4;

/// 组卷所需的最少条目数
pub const MIN_POOL_SIZE: usize = OPTIONS_PER_QUESTION;

/// 默认每次测验题目数
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// 默认答对一题奖励的 XP
pub const DEFAULT_XP_PER_CORRECT: u32 = 10;

/// 选择题答对/答错时映射到调度器的质量评分
pub const CORRECT_ANSWER_QUALITY: u8 = 4;
pub const WRONG_ANSWER_QUALITY: u8 = 1;

/// 仓库快照格式版本
pub const SNAPSHOT_VERSION: u32 = 1;

/// 默认学习者档案 ID
pub const DEFAULT_PROFILE_ID: &str = "default";
