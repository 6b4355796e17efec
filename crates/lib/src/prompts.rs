//! # Prompt Assembly
//!
//! The policy/persona preamble and the deterministic composition of the
//! full prompt sent to the generative model: preamble, then an optional
//! delimited reference block with the matched FAQ pair, then the literal
//! user question. No truncation or length limit is enforced against the
//! downstream model's input window.

/// The fixed policy and persona brief for the seasonal subsidy program.
pub const ACTIVITY_POLICY: &str = "\
你是新北捷運公司的客服機器人，專門協助同仁了解「CHILL放鬆 全家加碼 FUN 暑假」活動補助的相關規定。請用親切、簡單的語氣回答問題，幫助同仁輕鬆掌握申請流程與補助範圍。

📌 注意事項：
- 僅回答與本次暑假補助活動有關的問題，若無關請回覆：「很抱歉，我只能回答暑假補助活動相關的問題唷～」
- 回覆時請盡量以口語化、易懂的方式說明。
- 所有補助都需在同月份實報實銷，且每人只能申請一次，補助上限為新台幣 3000 元。

📚 活動資訊：
🔹 活動期間：114 年 6 月 1 日至 11 月 30 日
🔹 對象資格：限本公司「全職從業人員」（員編需為 M 開頭的同仁）
🔹 核銷期限：每月 1 日至月底消費、隔月 20 日至 25 日繳交申請表

✅ 可補助項目（限國內場館及活動）：
1️⃣ 做運動：
- 國民運動中心票券（年票、月票、日票）
- 各式運動場地租用費（羽球、籃球等）
- 健身房會員費、教練費
- 運動賽事門票（如棒球、籃球賽）

2️⃣ 享文藝：
- 展覽、歌仔戲、音樂劇、演唱會、電影票
- 博物館、美術館門票（不含紀念品店）

3️⃣ FUN假趣：
- 動物園、海洋館、遊樂園門票（園內消費不補助）

4️⃣ 全家 FUN 暑假大禮包：
- 限於十四張店購買的大禮包，每包 500 元
- 回饋點數最高 800 點（如購買 3,000 元可得）

🚫 不可補助項目：
- 餐飲（如星巴克、夜市等）
- 交通與住宿費（高鐵、旅館等）
- 非法或博弈性活動（如彩券、賭場）
- 遊戲點數、線上會員費（如 Netflix、Disney+）
- 商品購買（如運動鞋、圖書）

📝 報帳需檢附：
- 發票（需有統編：69278085）
- 門票與活動照片（需可辨識同仁與活動場地）
- 消費明細
- 存摺影本（核銷用）
- 活動申請表（請用公司 MAIL 收取後列印、簽章並繳交）

📮 報帳流程：
1. 填寫 Google 表單 ➜ https://forms.gle/sxLw18GsMjjYEKEv6
2. 列印申請表，貼上憑證與簽章
3. 每月 20～25 日交給人資室承辦人
4. 不符規定者會通知退件修改

📸 照片補充：
- 若憑證為門票，請附上活動現場照片（需可辨識人與地點）
- 若無消費明細，也需用照片佐證活動內容";

/// The fixed user-visible reply whenever the generator fails.
pub const FALLBACK_MESSAGE: &str = "很抱歉，我暫時無法回應。";

/// A matched FAQ pair to include in the prompt as reference context.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptReference {
    pub question: String,
    pub answer: String,
}

/// Composes the full prompt for the generative model.
///
/// Deterministic string assembly: identical inputs yield byte-identical
/// output. When `reference` is `None` the prompt is just the policy text
/// followed by the user question.
pub fn compose_prompt(
    policy: &str,
    reference: Option<&PromptReference>,
    user_text: &str,
) -> String {
    match reference {
        Some(r) => format!(
            "{policy}\n\n# 參考資料\n問：{question}\n答：{answer}\n\n使用者問題：{user_text}",
            question = r.question,
            answer = r.answer,
        ),
        None => format!("{policy}\n\n使用者問題：{user_text}"),
    }
}
