//! Built-in prompt bodies, one per (content type, language) pair.

use crate::content::{ContentType, Language};

const BLOG_POST_ENGLISH: &str = r#"You are an expert content creator specializing in engaging blog posts.

Topic: {topic}

Relevant Information: {context}

Write an awesome blog post with:
- Catchy Introduction
- 3 Main Sections (each with insights)
- Conclusion with key takeaways
- Call to Action

Blog Post:"#;

const BLOG_POST_TAMIL: &str = r#"நீங்கள் ஒரு திறமையான தமிழ் உள்ளடக்க படைப்பாளர்.

தலைப்பு: {topic}

தொடர்புடைய தகவல்: {context}

பின்வரும் அமைப்புடன் தமிழில் ஒரு சிறந்த வலைப்பதிவு கட்டுரையை எழுதுங்கள்:
- கவர்ச்சியான முன்னுரை
- 3 முக்கிய பகுதிகள் (ஒவ்வொன்றிலும் நுண்ணறிவுகள்)
- முக்கிய கருத்துகளுடன் முடிவுரை
- செயலுக்கான அழைப்பு

வலைப்பதிவு கட்டுரை:"#;

const SOCIAL_MEDIA_ENGLISH: &str = r#"You are a social media expert creating viral content.

Topic: {topic}
Platform: {platform}

Relevant Information: {context}

Write an engaging, shareable {platform} post (150-200 words):"#;

const SOCIAL_MEDIA_TAMIL: &str = r#"நீங்கள் ஒரு சமூக ஊடக உள்ளடக்க நிபுணர்.

தலைப்பு: {topic}
தளம்: {platform}

தொடர்புடைய தகவல்: {context}

{platform} தளத்திற்கு ஈர்க்கும், பகிரத்தக்க ஒரு பதிவை தமிழில் எழுதுங்கள் (150-200 சொற்கள்):"#;

const PRODUCT_DESCRIPTION_ENGLISH: &str = r#"You are an expert copywriter for e-commerce products.

Product Name: {product_name}
Features: {features}

Write a compelling, persuasive product description:"#;

const PRODUCT_DESCRIPTION_TAMIL: &str = r#"நீங்கள் ஒரு மின்வணிக விளம்பர எழுத்து நிபுணர்.

பொருளின் பெயர்: {product_name}
சிறப்பம்சங்கள்: {features}

வாடிக்கையாளர்களை ஈர்க்கும், நம்பவைக்கும் பொருள் விளக்கத்தை தமிழில் எழுதுங்கள்:"#;

const EMAIL_CAMPAIGN_ENGLISH: &str = r#"You are an email marketing expert.

Topic: {topic}

Relevant Information: {context}

Write an effective email campaign with:
- Subject Line (catchy & compelling)
- Body (personalized, engaging)
- Call to Action"#;

const EMAIL_CAMPAIGN_TAMIL: &str = r#"நீங்கள் ஒரு மின்னஞ்சல் சந்தைப்படுத்தல் நிபுணர்.

தலைப்பு: {topic}

தொடர்புடைய தகவல்: {context}

பின்வரும் கூறுகளுடன் தமிழில் ஒரு மின்னஞ்சல் பிரச்சாரத்தை எழுதுங்கள்:
- பொருள் வரி (கவர்ச்சியானது)
- உள்ளடக்கம் (தனிப்பட்ட, ஈர்க்கும் நடை)
- செயலுக்கான அழைப்பு"#;

const SEO_CONTENT_ENGLISH: &str = r#"You are an SEO content expert.

Target Keyword: {keyword}

Relevant Information: {context}

Write SEO-optimized content for "{keyword}":
- Include H1, H2 headings
- Meta description
- 500+ words with natural keyword placement"#;

const SEO_CONTENT_TAMIL: &str = r#"நீங்கள் ஒரு SEO உள்ளடக்க நிபுணர்.

முக்கிய சொல்: {keyword}

தொடர்புடைய தகவல்: {context}

"{keyword}" என்ற சொல்லுக்கு SEO-க்கு ஏற்ற உள்ளடக்கத்தை தமிழில் எழுதுங்கள்:
- H1, H2 தலைப்புகள்
- meta விளக்கம்
- இயல்பான முக்கிய சொல் பயன்பாட்டுடன் 500+ சொற்கள்"#;

/// Built-in body for a content type and language.
pub fn builtin_body(content_type: ContentType, language: Language) -> &'static str {
    match (content_type, language) {
        (ContentType::BlogPost, Language::English) => BLOG_POST_ENGLISH,
        (ContentType::BlogPost, Language::Tamil) => BLOG_POST_TAMIL,
        (ContentType::SocialMedia, Language::English) => SOCIAL_MEDIA_ENGLISH,
        (ContentType::SocialMedia, Language::Tamil) => SOCIAL_MEDIA_TAMIL,
        (ContentType::ProductDescription, Language::English) => PRODUCT_DESCRIPTION_ENGLISH,
        (ContentType::ProductDescription, Language::Tamil) => PRODUCT_DESCRIPTION_TAMIL,
        (ContentType::EmailCampaign, Language::English) => EMAIL_CAMPAIGN_ENGLISH,
        (ContentType::EmailCampaign, Language::Tamil) => EMAIL_CAMPAIGN_TAMIL,
        (ContentType::SeoContent, Language::English) => SEO_CONTENT_ENGLISH,
        (ContentType::SeoContent, Language::Tamil) => SEO_CONTENT_TAMIL,
    }
}
