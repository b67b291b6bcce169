use std::fmt;

#[derive(Debug, Clone)]
pub enum LinkerError {
    Validation(String),
    NotFound(String),
    FileOperation(String),
    Serialization(String),
    LinkFailed(String),
    HostCall(String),
    /// Raised by `PathDialog` implementations whose picker fails, e.g. a
    /// native dialog backend. The bundled `PresetDialog` never fails.
    Dialog(String),
    Config(String),
}

impl LinkerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkerError::Validation(_) => "E001",
            LinkerError::NotFound(_) => "E002",
            LinkerError::FileOperation(_) => "E003",
            LinkerError::Serialization(_) => "E004",
            LinkerError::LinkFailed(_) => "E005",
            LinkerError::HostCall(_) => "E006",
            LinkerError::Dialog(_) => "E007",
            LinkerError::Config(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkerError::Validation(_) => "Validation Error",
            LinkerError::NotFound(_) => "Resource Not Found",
            LinkerError::FileOperation(_) => "File Operation Error",
            LinkerError::Serialization(_) => "Serialization Error",
            LinkerError::LinkFailed(_) => "Link Creation Failed",
            LinkerError::HostCall(_) => "Host Call Error",
            LinkerError::Dialog(_) => "Path Dialog Error",
            LinkerError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkerError::Validation(msg)
            | LinkerError::NotFound(msg)
            | LinkerError::FileOperation(msg)
            | LinkerError::Serialization(msg)
            | LinkerError::LinkFailed(msg)
            | LinkerError::HostCall(msg)
            | LinkerError::Dialog(msg)
            | LinkerError::Config(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkerError {}

// 便捷的构造函数
impl LinkerError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkerError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkerError::NotFound(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkerError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkerError::Serialization(msg.into())
    }

    pub fn link_failed<T: Into<String>>(msg: T) -> Self {
        LinkerError::LinkFailed(msg.into())
    }

    pub fn host_call<T: Into<String>>(msg: T) -> Self {
        LinkerError::HostCall(msg.into())
    }

    /// For external `PathDialog` implementors
    pub fn dialog<T: Into<String>>(msg: T) -> Self {
        LinkerError::Dialog(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinkerError::Config(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for LinkerError {
    fn from(err: std::io::Error) -> Self {
        LinkerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkerError {
    fn from(err: serde_json::Error) -> Self {
        LinkerError::Serialization(err.to_string())
    }
}

impl From<walkdir::Error> for LinkerError {
    fn from(err: walkdir::Error) -> Self {
        LinkerError::FileOperation(err.to_string())
    }
}

impl From<tokio::task::JoinError> for LinkerError {
    fn from(err: tokio::task::JoinError) -> Self {
        LinkerError::HostCall(format!("host task aborted: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, LinkerError>;
