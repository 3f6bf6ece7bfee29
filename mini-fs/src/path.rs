/// 斜杠分隔绝对路径的拆分工具
pub trait Path {
    fn is_absolute(&self) -> bool;

    /// 返回根目录下的路径，若为根目录则返回`None`。
    fn root_relative(&self) -> Option<&Self>;

    /// 返回路径的`(父目录, 文件名)`，根目录返回`None`
    fn parent_file(&self) -> Option<(&Self, &Self)>;
}

impl Path for str {
    fn is_absolute(&self) -> bool {
        self.starts_with('/')
    }

    fn root_relative(&self) -> Option<&Self> {
        debug_assert!(self.is_absolute());

        (self != "/").then_some(self.trim_start_matches('/'))
    }

    //WARN: 暂时先假设路径不包含`.`与`..`
    fn parent_file(&self) -> Option<(&Self, &Self)> {
        if self == "/" {
            return None;
        }

        self.rsplit_once('/')
            .map(|(p, f)| if p.is_empty() { ("/", f) } else { (p, f) })
    }
}
