// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Webhook事件类型枚举
///
/// 定义了系统中可被订阅的CRM领域事件闭集。配置校验与
/// 分发匹配共享同一个枚举，不存在枚举之外的事件标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEventType {
    /// 线索创建
    #[serde(rename = "lead.created")]
    LeadCreated,
    /// 线索更新
    #[serde(rename = "lead.updated")]
    LeadUpdated,
    /// 线索删除
    #[serde(rename = "lead.deleted")]
    LeadDeleted,
    /// 线索转化
    #[serde(rename = "lead.converted")]
    LeadConverted,
    /// 联系人创建
    #[serde(rename = "contact.created")]
    ContactCreated,
    /// 联系人更新
    #[serde(rename = "contact.updated")]
    ContactUpdated,
    /// 联系人删除
    #[serde(rename = "contact.deleted")]
    ContactDeleted,
    /// 客户创建
    #[serde(rename = "account.created")]
    AccountCreated,
    /// 客户更新
    #[serde(rename = "account.updated")]
    AccountUpdated,
    /// 客户删除
    #[serde(rename = "account.deleted")]
    AccountDeleted,
    /// 商机创建
    #[serde(rename = "opportunity.created")]
    OpportunityCreated,
    /// 商机更新
    #[serde(rename = "opportunity.updated")]
    OpportunityUpdated,
    /// 商机赢单
    #[serde(rename = "opportunity.won")]
    OpportunityWon,
    /// 商机输单
    #[serde(rename = "opportunity.lost")]
    OpportunityLost,
    /// 活动记录创建
    #[serde(rename = "activity.created")]
    ActivityCreated,
    /// 活动记录完成
    #[serde(rename = "activity.completed")]
    ActivityCompleted,
    /// 测试事件，仅由测试投递路径使用
    #[serde(rename = "webhook.test")]
    WebhookTest,
}

impl WebhookEventType {
    /// 返回事件标识字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEventType::LeadCreated => "lead.created",
            WebhookEventType::LeadUpdated => "lead.updated",
            WebhookEventType::LeadDeleted => "lead.deleted",
            WebhookEventType::LeadConverted => "lead.converted",
            WebhookEventType::ContactCreated => "contact.created",
            WebhookEventType::ContactUpdated => "contact.updated",
            WebhookEventType::ContactDeleted => "contact.deleted",
            WebhookEventType::AccountCreated => "account.created",
            WebhookEventType::AccountUpdated => "account.updated",
            WebhookEventType::AccountDeleted => "account.deleted",
            WebhookEventType::OpportunityCreated => "opportunity.created",
            WebhookEventType::OpportunityUpdated => "opportunity.updated",
            WebhookEventType::OpportunityWon => "opportunity.won",
            WebhookEventType::OpportunityLost => "opportunity.lost",
            WebhookEventType::ActivityCreated => "activity.created",
            WebhookEventType::ActivityCompleted => "activity.completed",
            WebhookEventType::WebhookTest => "webhook.test",
        }
    }
}

impl fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WebhookEventType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lead.created" => Ok(WebhookEventType::LeadCreated),
            "lead.updated" => Ok(WebhookEventType::LeadUpdated),
            "lead.deleted" => Ok(WebhookEventType::LeadDeleted),
            "lead.converted" => Ok(WebhookEventType::LeadConverted),
            "contact.created" => Ok(WebhookEventType::ContactCreated),
            "contact.updated" => Ok(WebhookEventType::ContactUpdated),
            "contact.deleted" => Ok(WebhookEventType::ContactDeleted),
            "account.created" => Ok(WebhookEventType::AccountCreated),
            "account.updated" => Ok(WebhookEventType::AccountUpdated),
            "account.deleted" => Ok(WebhookEventType::AccountDeleted),
            "opportunity.created" => Ok(WebhookEventType::OpportunityCreated),
            "opportunity.updated" => Ok(WebhookEventType::OpportunityUpdated),
            "opportunity.won" => Ok(WebhookEventType::OpportunityWon),
            "opportunity.lost" => Ok(WebhookEventType::OpportunityLost),
            "activity.created" => Ok(WebhookEventType::ActivityCreated),
            "activity.completed" => Ok(WebhookEventType::ActivityCompleted),
            "webhook.test" => Ok(WebhookEventType::WebhookTest),
            _ => Err(()),
        }
    }
}
