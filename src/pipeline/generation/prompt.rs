/// Patient-facing visit summary in the canonical layout.
pub fn build_visit_summary_prompt(transcript: &str) -> String {
    format!(
        r#"角色：你是一位有耐心、善於溝通的家庭醫師或衛教護理師。你的專長是將複雜的醫療資訊，用溫暖、簡單易懂的語言解釋給病患聽。

任務：請將以下的「醫病對話逐字稿」，轉換成一份給病患本人看的「看診重點摘要」，幫助病患回家後清楚回顧看診內容並遵循醫囑。

格式要求（必須嚴格遵守）：

## 看診重點摘要

**看診原因**
[內容]

**診斷結果**
[內容]

**治療計畫**
[內容]

**注意事項**
[內容]

1. 標題必須是「## 看診重點摘要」（兩個井號和空格）
2. 小標題必須是「**看診原因**」、「**診斷結果**」、「**治療計畫**」、「**注意事項**」
3. 每個部分之間必須有空行分隔
4. 不能省略 Markdown 格式符號（## 和 **）

內容指引：
- 用1-2個段落描述每個部分
- 用白話解釋，避免專業術語
- 嚴格基於逐字稿，不添加額外資訊

醫病對話逐字稿：
---
{transcript}
---

請嚴格按照上述格式生成摘要，開始：
"#
    )
}

/// SOAP note as a JSON object.
pub fn build_soap_prompt(transcript: &str) -> String {
    format!(
        r#"角色：你是一位專業的醫療記錄專家，專門將醫病對話逐字稿轉換成標準的 SOAP 格式醫療記錄。

SOAP 格式說明：
- S (Subjective): 主觀症狀，病患描述的主訴、症狀、感受
- O (Objective): 客觀發現，醫師觀察到的客觀事實、檢查結果、生命徵象
- A (Assessment): 評估，醫師的診斷、判斷、分析
- P (Plan): 計畫，治療計畫、用藥、追蹤、衛教

規則：
1. 嚴格按照 SOAP 格式分類資訊
2. 內容必須基於逐字稿，不可添加額外資訊
3. 使用繁體中文
4. 如果某部分沒有資訊則標註「無」

醫病對話逐字稿：
---
{transcript}
---

請按照以下 JSON 格式回傳 SOAP 摘要：
{{
  "subjective": "主觀症狀內容",
  "objective": "客觀發現內容",
  "assessment": "評估內容",
  "plan": "計畫內容"
}}
"#
    )
}
