//! 工具函数

use std::time::Duration;

/// 格式化持续时间为人类可读的字符串
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();

    if seconds < 60 {
        return format!("{} 秒", seconds);
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{} 分钟 {} 秒", minutes, seconds % 60);
    }

    let hours = minutes / 60;
    format!("{} 小时 {} 分钟", hours, minutes % 60)
}

/// 格式化剩余有效期，已过期时返回 "0 秒"
pub fn format_remaining(remaining: chrono::Duration) -> String {
    format_duration(remaining.to_std().unwrap_or(Duration::ZERO))
}
