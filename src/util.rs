use bytesize::ByteSize;
use std::path::{Component, Path, PathBuf};

// 将路径字符串中的分隔符统一为当前平台的分隔符
pub fn normalize_separators(path_str: &str) -> String {
    if cfg!(windows) {
        path_str.replace('/', "\\")
    } else {
        path_str.replace('\\', "/")
    }
}

// 解析守护进程上报的路径字符串，分隔符可能与本平台不一致
pub fn parse_daemon_path(path_str: &str) -> PathBuf {
    PathBuf::from(normalize_separators(path_str))
}

// 词法清理路径中的"."和".."冗余成分，不要求路径存在
pub fn clean_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => continue,
            Component::ParentDir => {
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                } else {
                    components.push(component);
                }
            }
            _ => components.push(component),
        }
    }

    let mut result = PathBuf::new();
    for component in components {
        result.push(component.as_os_str());
    }

    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}

// 尝试规范化路径；路径不存在时原样返回
// 守护进程上报的保存路径可能指向尚未创建的目录
pub fn try_canonicalize(path: &Path) -> PathBuf {
    match path.canonicalize() {
        Ok(canonical) => canonical,
        Err(_) => path.to_path_buf(),
    }
}

/// 活跃文件绝对路径的唯一构建入口。
/// 集合构建与目录遍历双方必须经由同一套规范化规则得到路径，
/// 否则写法不同而语义相同的路径会被错误判定为孤立文件。
pub fn join_normalized(base: &Path, relative: &str) -> PathBuf {
    let base = try_canonicalize(&clean_path(base));
    clean_path(&base.join(normalize_separators(relative)))
}

// 字节数转换为人类可读格式
pub fn format_bytes(size: u64) -> String {
    ByteSize(size).to_string_as(true)
}
