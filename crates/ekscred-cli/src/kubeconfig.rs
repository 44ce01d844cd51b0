//! kubeconfig 查看模块
//!
//! 以表格形式列出 kubeconfig 中的上下文及其引用的集群和用户，
//! 当前上下文以 `*` 标记，引用不存在的集群或用户显示为 `(not found)`。

use ekscred_common::{Error, Result};
use kube::config::{Context, Kubeconfig};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// 引用缺失时的占位文本
const NOT_FOUND: &str = "(not found)";

/// 表头
const HEADERS: [&str; 3] = ["CONTEXT NAME", "CLUSTER", "USER"];

/// 表格中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRow {
    /// 上下文名，当前上下文带 `*` 前缀
    pub name: String,
    /// 集群名
    pub cluster: String,
    /// 用户名
    pub user: String,
}

/// 加载 kubeconfig
///
/// 指定路径时只读取该文件，否则按 `KUBECONFIG` 环境变量或 `~/.kube/config` 加载并合并。
pub fn load(path: Option<&Path>) -> Result<Kubeconfig> {
    let result = match path {
        Some(path) => {
            debug!("从 {} 加载 kubeconfig", path.display());
            Kubeconfig::read_from(path)
        }
        None => Kubeconfig::read(),
    };
    result.map_err(|e| Error::Kubeconfig(format!("无法加载 kubeconfig: {}", e)))
}

/// 提取按名称排序的上下文行
pub fn context_rows(config: &Kubeconfig) -> Vec<ContextRow> {
    let clusters: HashSet<&str> = config.clusters.iter().map(|c| c.name.as_str()).collect();
    let users: HashSet<&str> = config.auth_infos.iter().map(|u| u.name.as_str()).collect();
    let current = config.current_context.as_deref();

    let mut contexts: Vec<_> = config.contexts.iter().collect();
    contexts.sort_by(|a, b| a.name.cmp(&b.name));

    contexts
        .into_iter()
        .map(|named| {
            let context = Option::<Context>::from(named.context.clone());
            let cluster = context.as_ref().map(|c| c.cluster.clone());
            let user = context.and_then(|c| Option::<String>::from(c.user));

            let name = if Some(named.name.as_str()) == current {
                format!("*{}", named.name)
            } else {
                named.name.clone()
            };

            ContextRow {
                name,
                cluster: resolve(cluster, &clusters),
                user: resolve(user, &users),
            }
        })
        .collect()
}

/// 引用存在时返回其名称，否则返回占位文本
fn resolve(reference: Option<String>, known: &HashSet<&str>) -> String {
    match reference {
        Some(r) if known.contains(r.as_str()) => r,
        _ => NOT_FOUND.to_string(),
    }
}

/// 渲染带边框的表格
pub fn render_table(rows: &[ContextRow]) -> String {
    let mut widths = HEADERS.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip([&row.name, &row.cluster, &row.user]) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = {
        let segments: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        format!("+{}+\n", segments.join("+"))
    };
    let line = |cells: [&str; 3]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!(" {:<width$} ", cell, width = *width))
            .collect();
        format!("|{}|\n", padded.join("|"))
    };

    let mut out = String::new();
    out.push_str(&border);
    out.push_str(&line(HEADERS));
    out.push_str(&border);
    for row in rows {
        out.push_str(&line([row.name.as_str(), row.cluster.as_str(), row.user.as_str()]));
    }
    out.push_str(&border);
    out
}
