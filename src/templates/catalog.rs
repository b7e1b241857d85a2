use serde::Serialize;

/// Metadata of one downloadable résumé template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeTemplate {
    pub id: u32,
    pub name: &'static str,
    pub short_description: &'static str,
    pub full_description: &'static str,
    pub image_url: &'static str,
    pub download_url: &'static str,
    pub tags: &'static [&'static str],
    pub style: &'static str,
    pub industry: &'static str,
}

static CATALOG: &[ResumeTemplate] = &[
    ResumeTemplate {
        id: 1,
        name: "Professional Business",
        short_description: "A professional layout for business and management roles",
        full_description: "A clean, restrained template built for business and management \
            positions. The layout puts professional experience and leadership up front and \
            suits candidates in finance, consulting and management.",
        image_url: "./assets/images/templates/template1.jpg",
        download_url: "./assets/downloads/template1.docx",
        tags: &["professional", "business", "management"],
        style: "professional",
        industry: "finance",
    },
    ResumeTemplate {
        id: 2,
        name: "Modern Tech",
        short_description: "A modern two-column layout for engineering roles",
        full_description: "A two-column template with a dedicated skills sidebar and room \
            for project highlights. Designed for software engineers, data scientists and \
            other technical roles.",
        image_url: "./assets/images/templates/template2.jpg",
        download_url: "./assets/downloads/template2.docx",
        tags: &["modern", "technology", "engineering"],
        style: "modern",
        industry: "technology",
    },
    ResumeTemplate {
        id: 3,
        name: "Creative Portfolio",
        short_description: "A bold layout for design and media roles",
        full_description: "A colourful template with a portfolio section and a strong visual \
            header, suited to designers, marketers and content creators.",
        image_url: "./assets/images/templates/template3.jpg",
        download_url: "./assets/downloads/template3.docx",
        tags: &["creative", "design", "portfolio"],
        style: "creative",
        industry: "design",
    },
    ResumeTemplate {
        id: 4,
        name: "Graduate Starter",
        short_description: "A simple one-page layout for new graduates",
        full_description: "A single-page template that leads with education, coursework and \
            internships. A good fit for students and recent graduates entering the job market.",
        image_url: "./assets/images/templates/template4.jpg",
        download_url: "./assets/downloads/template4.docx",
        tags: &["simple", "graduate", "entry-level"],
        style: "simple",
        industry: "education",
    },
];

pub fn catalog() -> &'static [ResumeTemplate] {
    CATALOG
}

pub fn find(id: u32) -> Option<&'static ResumeTemplate> {
    CATALOG.iter().find(|t| t.id == id)
}
