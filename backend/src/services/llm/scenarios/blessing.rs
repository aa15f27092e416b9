//! Blessing Scenario - prompt assembly for Spring Festival greetings

use crate::models::{Category, GenerationRequest, Style, YearFact};
use crate::services::lunar;

/// Length constraint per category; unknown categories get none
pub fn length_constraint(category: &Category) -> &'static str {
    match category {
        Category::MomentsPost => "字数控制在50-80字左右，适合微信朋友圈发布",
        Category::Microblog => "字数控制在140字以内，适合微博发布",
        Category::NewYearGreeting => "字数可以稍微多一点，内容更丰富，适合用于海报或贺卡",
        Category::NewYearWish => "字数控制在20字以内，简短精炼，适合作为一句话祝福",
        Category::Other(_) => "",
    }
}

/// Tone instruction per style; unknown styles get none
pub fn style_instruction(style: &Style) -> &'static str {
    match style {
        Style::Modern => "语言要现代、活泼、有创意，可以适当使用一些网络流行语，但要保持节日氛围",
        Style::Classical => "语言要古雅、有韵味，使用文言文或半文半白的表达方式，体现传统文化底蕴",
        Style::Traditional => "语言要正式、庄重，使用传统的祝福语表达方式，体现春节的传统习俗",
        Style::Other(_) => "",
    }
}

/// Everything the blessing prompt needs
#[derive(Debug, Clone)]
pub struct BlessingPrompt<'a> {
    pub fact: YearFact,
    pub category: &'a Category,
    pub style: &'a Style,
    pub keyword: Option<&'a str>,
}

impl<'a> BlessingPrompt<'a> {
    /// Prompt for `request` around an already computed `fact`
    pub fn new(fact: YearFact, request: &'a GenerationRequest) -> Self {
        Self {
            fact,
            category: &request.category,
            style: &request.style,
            keyword: request.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()),
        }
    }

    pub fn render(&self) -> String {
        let length_limit = length_constraint(self.category);
        let style_hint = style_instruction(self.style);
        let YearFact { year, lunar_year_name, zodiac } = &self.fact;

        let (keyword_line, keyword_requirement) = match self.keyword {
            Some(keyword) => (
                format!("\n关键词：{}", keyword),
                format!("\n5. 祝福语需要围绕关键词「{}」进行创作，将关键词自然融入祝福语中", keyword),
            ),
            None => (String::new(), String::new()),
        };

        format!(
            "你是一位擅长创作春节祝福语的专家。请根据以下信息创作一条春节祝福语：

年份信息：{year}年是{lunar_year_name}，生肖是{zodiac}年
祝福语类别：{category}（{length_limit}）
祝福语风格：{style}（{style_hint}）{keyword_line}

要求：
1. 祝福语要体现出年份特色，包含{zodiac}年的元素
2. 语言要符合指定的风格要求
3. 内容要积极向上，充满节日祝福
4. {length_limit}{keyword_requirement}

请直接输出祝福语内容，不要包含任何其他解释或说明。",
            category = self.category,
            style = self.style,
        )
    }
}

/// Build the prompt for a validated request
pub fn build_prompt(request: &GenerationRequest) -> String {
    BlessingPrompt::new(lunar::year_fact(request.year), request).render()
}
