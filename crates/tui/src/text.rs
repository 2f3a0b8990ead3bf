//! User-visible strings. These are part of the control's contract and must
//! stay byte-for-byte identical.

pub const DEFAULT_BUTTON_TEXT: &str = "OAuth2 授权";

pub const MISSING_PROVIDER: &str = "未指定 Provider";
pub const AUTH_URL_FAILED: &str = "获取授权链接失败";
pub const AUTH_URL_NETWORK_FAILED: &str = "获取授权链接失败，请检查网络连接";
pub const EMPTY_CODE: &str = "请输入授权码";
pub const EXCHANGE_SUCCEEDED: &str = "授权成功！";
pub const EXCHANGE_FAILED: &str = "授权失败";
pub const EXCHANGE_NETWORK_FAILED: &str = "授权失败，请检查授权码是否正确";

pub const DIALOG_TITLE: &str = "OAuth2 授权";
pub const PKCE_SUBTITLE: &str = "使用 PKCE 安全授权";
pub const STEPS_TITLE: &str = "授权步骤";
pub const STEPS: [&str; 5] = [
    "点击下方链接打开授权页面",
    "在授权页面登录并同意授权",
    "复制授权后获得的授权码",
    "将授权码粘贴到下方输入框",
    "点击\"确认授权\"按钮完成",
];
pub const CODE_STATE_WARNING: &str = "注意：授权码格式为 code#state，请完整复制（包含 # 符号）";

pub const LINK_LABEL: &str = "授权链接：";
pub const LINK_TEXT: &str = "点击此处打开授权页面";
pub const REOPEN: &str = "重新打开";

pub const CODE_LABEL: &str = "授权码";
pub const CODE_STATE_PLACEHOLDER: &str = "例如：abc123#xyz789";
pub const CODE_PLACEHOLDER: &str = "粘贴授权码";
pub const CODE_HELPER: &str = "请完整复制授权后显示的授权码";

pub const LOADING: &str = "加载中...";
pub const EXCHANGING: &str = "授权中...";
pub const SUBMIT: &str = "确认授权";
pub const CANCEL: &str = "取消";
