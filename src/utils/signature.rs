// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// 签名头的格式前缀
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// 为序列化后的负载计算签名
///
/// 对即将写入请求体的精确字节序列计算HMAC-SHA256。
/// 同一投递的每次重试都必须复用同一份序列化字节，
/// 因此对相同输入本函数的输出恒定。
///
/// # 参数
///
/// * `body` - 序列化后的负载字节
/// * `secret` - 共享签名密钥
///
/// # 返回值
///
/// 返回 `"sha256=<hex>"` 格式的签名字符串
pub fn sign_payload(body: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(body);
    format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
}

/// 校验负载签名
///
/// 接收方按文档约定重算HMAC并与签名头比较。
/// 使用常数时间比较，避免时序侧信道。
///
/// # 参数
///
/// * `signature` - 收到的签名头值（`"sha256=<hex>"`）
/// * `body` - 原始请求体字节
/// * `secret` - 共享签名密钥
///
/// # 返回值
///
/// 签名匹配时返回true
pub fn verify_signature(signature: &str, body: &[u8], secret: &str) -> bool {
    let computed = sign_payload(body, secret);
    constant_time_eq(signature.as_bytes(), computed.as_bytes())
}

/// 常数时间字节比较
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
