//! Prompts for the summary checkers and the modification proposer.
//!
//! Each prompt names the exact JSON shape the response parser expects. The
//! top-level keys (`issues`, `missing_items`, `highlights`, `modifications`)
//! are distinct so responses cannot be confused across checkers.

/// Fact-consistency check between transcript and summary.
pub fn build_consistency_prompt(transcript: &str, summary: &str) -> String {
    format!(
        r#"作為醫療摘要品質控制專家，請檢查以下摘要是否與原始對話逐字稿一致：

原始對話逐字稿：
---
{transcript}
---

生成的摘要：
---
{summary}
---

請檢查以下項目：
1. 症狀描述是否一致
2. 數值是否準確
3. 診斷建議是否基於原始內容
4. 治療計畫是否合理

請以 JSON 格式回傳結果，使用繁體中文：
{{
  "consistency_score": 0-100,
  "issues": [
    {{
      "type": "symptom_mismatch|value_error|diagnosis_inconsistency|treatment_unfounded",
      "severity": "low|medium|high|critical",
      "description": "具體問題描述，請詳細說明哪裡不一致",
      "suggestion": "具體的改善建議，請說明如何修正"
    }}
  ]
}}
"#
    )
}

/// Missing-information check between transcript and summary.
pub fn build_missing_info_prompt(transcript: &str, summary: &str) -> String {
    format!(
        r#"作為醫療品質控制專家，請檢查摘要是否遺漏了重要資訊：

原始對話逐字稿：
---
{transcript}
---

生成的摘要：
---
{summary}
---

請檢查是否遺漏以下重要資訊，並詳細說明缺漏的具體內容：
1. 重要症狀描述（症狀的詳細描述、持續時間、嚴重程度等）
2. 關鍵生命徵象（血壓、心率、體溫、呼吸頻率、血氧飽和度等）
3. 藥物過敏史（過敏藥物名稱、過敏反應類型等）
4. 既往病史（過去疾病、手術史、慢性病等）
5. 家族病史（家族遺傳疾病、相關疾病史等）
6. 社會史（吸菸、飲酒、職業暴露、生活習慣等）

請以 JSON 格式回傳，使用繁體中文：
{{
  "missing_items": [
    {{
      "type": "symptom|vital_sign|allergy|medical_history|family_history|social_history",
      "severity": "low|medium|high|critical",
      "description": "詳細說明缺漏的具體資訊內容，例如：缺漏血壓數值",
      "suggestion": "具體建議如何補充這些資訊，例如：請記錄收縮壓和舒張壓數值"
    }}
  ]
}}
"#
    )
}

/// Key-information extraction over the summary alone.
pub fn build_highlight_prompt(summary: &str) -> String {
    format!(
        r#"作為醫療資訊專家，請從以下摘要中識別並標記關鍵醫療資訊：

摘要內容：
---
{summary}
---

請識別以下類型的關鍵資訊：
1. 生命徵象數值（血壓、心率、體溫、呼吸頻率等）
2. 實驗室檢查結果（血糖、膽固醇、血紅素等）
3. 藥物名稱和劑量
4. 重要症狀描述
5. 診斷結果
6. 治療建議

位置以字元計算，start_pos 含、end_pos 不含。

請以 JSON 格式回傳，使用繁體中文：
{{
  "highlights": [
    {{
      "text": "識別到的關鍵資訊",
      "start_pos": 0,
      "end_pos": 0,
      "category": "vital_signs|lab_values|medications|symptoms|diagnosis|treatment",
      "confidence": 0.0,
      "importance": "low|medium|high|critical"
    }}
  ]
}}
"#
    )
}

/// Edit proposals. The rules block is what keeps structural lines intact on
/// the model side; the patcher enforces the same rules on ours.
pub fn build_modification_prompt(transcript: &str, summary: &str) -> String {
    format!(
        r#"作為醫療摘要審核專家，請仔細比較逐字稿和摘要，檢測任何不一致之處。

逐字稿：
{transcript}

當前摘要（請注意保持 Markdown 格式）：
{summary}

請檢查以下問題：
1. 用詞差異：摘要中的用詞是否與逐字稿一致
2. 細節差異：摘要是否遺漏了逐字稿中的重要細節
3. 事實不一致：摘要中的資訊是否與逐字稿不符
4. 數值錯誤：摘要中的數值是否與逐字稿中的數值一致
5. 時間錯誤：摘要中的時間描述是否正確

請以 JSON 格式回傳檢測結果，使用繁體中文：
{{
  "modifications": [
    {{
      "type": "replace|highlight|remove",
      "title": "錯誤標題",
      "description": "發現的具體錯誤",
      "original_text": "摘要中需要修改的具體文字",
      "correct_text": "應該替換成的正確文字",
      "reason": "為什麼這是錯誤的",
      "severity": "critical|high|medium|low",
      "category": "hallucination|fact_error|value_error|time_error|diagnosis_error|treatment_error",
      "start": 0,
      "end": 0
    }}
  ]
}}

重要要求：
1. 絕對嚴禁更動 Markdown 結構：不得修改標題（## 看診重點摘要）、粗體標題（**看診原因**、**診斷結果**、**治療計畫**、**注意事項**）、換行與空行。
2. 僅允許句內最小範圍替換：不得把多行合併成一行，不得修改段落結構。
3. original_text 必須是摘要中實際存在的文字，且不包含換行字元。
4. correct_text 必須是基於逐字稿的正確內容，且不包含換行字元。
5. 幻覺內容使用 remove 類型；事實錯誤使用 replace 類型。
6. 請提供 original_text 在摘要中的字元位置：start（含）與 end（不含）。
7. 如果沒有發現錯誤，請回傳：{{"modifications": []}}
"#
    )
}
