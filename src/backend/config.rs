// src/backend/config.rs
use crate::error::RegistryError;
use crate::models::account::SeedAccount;
use crate::models::common::Role;
use crate::models::reference::{PaymentType, ReferenceCategory, ReferenceEntry};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOG_CAPACITY: usize = 1000;
pub const DEFAULT_COMPLETE_STATUS: &str = "完毕";
pub const DEFAULT_REJECT_STATUS: &str = "退回";
pub const DEFAULT_SYSTEM_ACTOR: &str = "system";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    /// Operation-log entries kept; the oldest are dropped first.
    pub log_capacity: usize,
    pub password_policy: PasswordPolicy,
    /// Terminal status value; records in it carry an end date.
    pub complete_status: String,
    /// Status value that requires a reject reason.
    pub reject_status: String,
    /// Actor recorded in the operation log when no session is active.
    pub system_actor: String,
    /// Length of the temporary password handed out by an admin reset.
    pub temporary_password_length: usize,
    pub seeds: ReferenceSeeds,
    pub seed_accounts: Vec<SeedAccount>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_letter: bool,
    pub require_digit: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8, require_letter: true, require_digit: true }
    }
}

impl PasswordPolicy {
    /// Returns the first rule `password` breaks.
    pub fn check(&self, password: &str) -> Result<(), RegistryError> {
        if password.chars().count() < self.min_length {
            return Err(RegistryError::WeakPassword(format!(
                "password must be at least {} characters",
                self.min_length
            )));
        }
        if self.require_letter && !password.chars().any(|c| c.is_ascii_alphabetic()) {
            return Err(RegistryError::WeakPassword("password must contain a letter".to_string()));
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(RegistryError::WeakPassword("password must contain a digit".to_string()));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ReferenceSeeds {
    pub file_types: Vec<String>,
    pub departments: Vec<String>,
    pub units: Vec<String>,
    pub statuses: Vec<String>,
    pub payment_companies: Vec<String>,
    pub payment_types: Vec<PaymentType>,
    pub payment_projects: Vec<String>,
}

impl ReferenceSeeds {
    pub fn entries(&self, category: ReferenceCategory) -> Vec<ReferenceEntry> {
        let plain = |values: &[String]| values.iter().cloned().map(ReferenceEntry::Value).collect();
        match category {
            ReferenceCategory::FileTypes => plain(&self.file_types),
            ReferenceCategory::Departments => plain(&self.departments),
            ReferenceCategory::Units => plain(&self.units),
            ReferenceCategory::Statuses => plain(&self.statuses),
            ReferenceCategory::PaymentCompanies => plain(&self.payment_companies),
            ReferenceCategory::PaymentTypes => {
                self.payment_types.iter().cloned().map(ReferenceEntry::PaymentType).collect()
            }
            ReferenceCategory::PaymentProjects => plain(&self.payment_projects),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for ReferenceSeeds {
    fn default() -> Self {
        Self {
            file_types: strings(&[
                "采购计划审批表", "合同（协议）签订审批表", "付款申请单", "用印审批表",
                "付款单+用印审批（仅限验收报告）", "工作联系单", "固定资产验收单", "会议议题",
                "借印审批表", "请假申请表", "差旅申请表", "其他",
            ]),
            departments: strings(&[
                "前厅FO", "客房HSKP", "西餐厅", "中餐厅", "大堂吧", "宴会厅", "迷你吧",
                "餐饮办公室", "管事部", "饼房", "财务FIN", "行政EO", "人事HR",
                "员工餐厅", "销售S&M", "工程ENG",
            ]),
            units: strings(&[
                "/", "批", "个（支）", "件", "套", "份", "只", "台", "桶", "次", "块",
                "人", "盒", "瓶", "双", "张", "月", "年", "克（g）", "千克（kg）", "箱",
                "米", "平方米", "包", "袋", "家", "PCS", "PAC", "佣金（%）", "其他",
            ]),
            statuses: strings(&[
                "完毕", "总秘（酒店总经理）", "待送集团", "业主代表",
                "陆总及彭总（盖章处）", "集团审核", "集团经理待签", "退回",
                "未盖章", "重签", "作废", "资产管理部", "招采办",
                "酒店内部走签", "急单", "已签未付",
            ]),
            payment_companies: strings(&[
                "一泽", "置合", "鼎舒盛", "卉好", "晓逸", "青美源", "国方",
                "景地", "天果", "琪茗享", "荣世悦", "万好", "邦扣", "海尚鲜",
                "全季", "锦泰", "琛宓", "捷亚", "聚百味", "统乐", "凯普盛惠",
                "喜福恩", "圣皮尔", "银蕨", "橙宝", "金莱", "其他",
            ]),
            payment_types: vec![
                PaymentType::new("货款", false),
                PaymentType::new("费用", false),
                PaymentType::new("款项", false),
                PaymentType::new("预付款", true),
                PaymentType::new("验收款", true),
                PaymentType::new("尾款", true),
                PaymentType::new("其他", false),
            ],
            payment_projects: strings(&[
                "外包-保安员", "外包-保洁员（PA）", "外包-客房服务员（楼层）", "外包-管事部清洁",
                "外包-餐饮小时工", "外包-实习生", "绿植租摆", "鲜花购买", "客房布草及制服洗涤",
                "餐饮布草洗涤", "控虫消杀", "垃圾清运", "员工宿舍租赁", "建筑消防设施维护",
                "油烟管道清洗", "水箱处理及水质检测", "空调水处理",
                "打印机租赁（销售、财务部1台）", "打印机租赁（人事、采购部2台）",
                "蔬菜水果", "肉禽", "冻品", "海产品", "调味品", "酒水", "冰淇淋", "咖啡豆",
                "果汁", "员工饮用水", "定制矿泉水", "客人一次性用品", "部门杂项", "办公用品",
                "固定资产", "其他",
            ]),
        }
    }
}

fn default_seed_accounts() -> Vec<SeedAccount> {
    vec![
        SeedAccount {
            username: "TYL2025".to_string(),
            password: "941314aA".to_string(),
            display_name: "总管理员".to_string(),
            role: Role::Admin,
            first_login: false,
        },
        SeedAccount {
            username: "8888".to_string(),
            password: "8888".to_string(),
            display_name: "普通管理员".to_string(),
            role: Role::Manager,
            first_login: true,
        },
        SeedAccount {
            username: "1001".to_string(),
            password: "1001".to_string(),
            display_name: "普通账号".to_string(),
            role: Role::User,
            first_login: true,
        },
    ]
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_LOG_CAPACITY,
            password_policy: PasswordPolicy::default(),
            complete_status: DEFAULT_COMPLETE_STATUS.to_string(),
            reject_status: DEFAULT_REJECT_STATUS.to_string(),
            system_actor: DEFAULT_SYSTEM_ACTOR.to_string(),
            temporary_password_length: 12,
            seeds: ReferenceSeeds::default(),
            seed_accounts: default_seed_accounts(),
        }
    }
}

impl RegistryConfig {
    /// Parses a TOML document; keys it leaves out keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, RegistryError> {
        let config: RegistryConfig =
            toml::from_str(source).map_err(|e| RegistryError::invalid(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        let mut problems = Vec::new();
        if self.log_capacity == 0 {
            problems.push("config: log_capacity must be positive".to_string());
        }
        if self.password_policy.min_length == 0 {
            problems.push("config: password_policy.min_length must be positive".to_string());
        }
        if self.complete_status.trim().is_empty() {
            problems.push("config: complete_status must not be empty".to_string());
        }
        if self.reject_status.trim().is_empty() {
            problems.push("config: reject_status must not be empty".to_string());
        }
        // Resets must hand out passwords the policy accepts.
        if self.temporary_password_length < self.password_policy.min_length.max(2) {
            problems.push("config: temporary_password_length is below the password minimum".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::Validation(problems))
        }
    }

    pub fn is_complete(&self, status: Option<&str>) -> bool {
        status == Some(self.complete_status.as_str())
    }

    pub fn is_reject(&self, status: Option<&str>) -> bool {
        status == Some(self.reject_status.as_str())
    }
}
