//! 简历预览
//!
//! 把 ResumeData 渲染成单栏的带样式行文档。TUI 预览、打印与 PDF 导出
//! 共用同一份 Document。

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::models::{PersonalInfo, ResumeData, parse_month};

/// 行样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Name,
    Contact,
    Heading,
    Title,
    Subtitle,
    Date,
    Body,
    Blank,
}

impl LineStyle {
    pub fn is_centered(self) -> bool {
        matches!(self, LineStyle::Name | LineStyle::Contact)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocLine {
    pub style: LineStyle,
    pub text: String,
}

/// 渲染后的文档
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub lines: Vec<DocLine>,
}

impl Document {
    fn push(&mut self, style: LineStyle, text: impl Into<String>) {
        self.lines.push(DocLine {
            style,
            text: text.into(),
        });
    }

    fn push_if(&mut self, style: LineStyle, text: &str) {
        if !text.is_empty() {
            self.push(style, text);
        }
    }

    fn blank(&mut self) {
        self.push(LineStyle::Blank, "");
    }

    fn heading(&mut self, title: &str) {
        if !self.lines.is_empty() {
            self.blank();
        }
        self.push(LineStyle::Heading, title);
    }

    /// 按换行拆开后的行数
    pub fn row_count(&self) -> usize {
        self.lines.iter().map(|line| line.text.split('\n').count()).sum()
    }

    #[cfg(test)]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.text.contains(needle))
    }

    /// 纯文本渲染（用于打印）
    pub fn to_plain_text(&self, width: usize) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line.style {
                LineStyle::Blank => out.push('\n'),
                LineStyle::Heading => {
                    let title = line.text.to_uppercase();
                    let rule = "-".repeat(display_width(&title).min(width));
                    out.push_str(&title);
                    out.push('\n');
                    out.push_str(&rule);
                    out.push('\n');
                }
                style => {
                    let text = if style == LineStyle::Name {
                        line.text.to_uppercase()
                    } else {
                        line.text.clone()
                    };
                    for row in wrap_words(&text, width) {
                        if style.is_centered() {
                            let pad = width.saturating_sub(display_width(&row)) / 2;
                            out.push_str(&" ".repeat(pad));
                        }
                        out.push_str(&row);
                        out.push('\n');
                    }
                }
            }
        }
        out
    }
}

/// 显示宽度，中日韩等全角字符占两列
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// 按单词贪心折行，宽度按显示列数计；超长单词强制截断，保留原有换行
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in text.split('\n') {
        let mut row = String::new();
        let mut row_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = display_width(word);
            if word_width > width {
                if row_width > 0 {
                    rows.push(std::mem::take(&mut row));
                    row_width = 0;
                }
                // 逐字符切开，每段至少一个字符
                for c in word.chars() {
                    let w = c.width().unwrap_or(0);
                    if row_width + w > width && !row.is_empty() {
                        rows.push(std::mem::take(&mut row));
                        row_width = 0;
                    }
                    row.push(c);
                    row_width += w;
                }
                continue;
            }

            let needed = if row_width == 0 {
                word_width
            } else {
                row_width + 1 + word_width
            };
            if needed > width {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            if row_width > 0 {
                row.push(' ');
                row_width += 1;
            }
            row.push_str(word);
            row_width += word_width;
        }

        rows.push(row);
    }

    rows
}

/// "2020-01" -> "January 2020"；无法解析时原样返回
pub fn format_month(value: &str) -> String {
    if value.trim().is_empty() {
        return String::new();
    }
    match parse_month(value) {
        Some(date) => date.format("%B %Y").to_string(),
        None => value.to_string(),
    }
}

pub fn date_range(start: &str, end: &str, current: bool) -> String {
    let start = format_month(start);
    let end = if current {
        "Present".to_string()
    } else {
        format_month(end)
    };
    match (start.is_empty(), end.is_empty()) {
        (true, true) => String::new(),
        (false, true) => start,
        (true, false) => end,
        (false, false) => format!("{} - {}", start, end),
    }
}

/// 是否有可预览的内容
pub fn has_data(resume: &ResumeData) -> bool {
    let info = &resume.personal_info;
    !info.first_name.is_empty()
        || !info.last_name.is_empty()
        || !info.email.is_empty()
        || !resume.experience.is_empty()
        || !resume.education.is_empty()
        || !resume.projects.is_empty()
        || !resume.certifications.is_empty()
}

/// 构建文档；无内容时返回 None（空状态）
pub fn build(resume: &ResumeData) -> Option<Document> {
    if !has_data(resume) {
        return None;
    }

    let mut doc = Document::default();
    header(&mut doc, &resume.personal_info);

    if !resume.personal_info.summary.is_empty() {
        doc.heading("Professional Summary");
        doc.push(LineStyle::Body, resume.personal_info.summary.as_str());
    }

    if !resume.experience.is_empty() {
        doc.heading("Professional Experience");
        for (i, exp) in resume.experience.iter().enumerate() {
            if i > 0 {
                doc.blank();
            }
            doc.push(LineStyle::Title, exp.title.as_str());
            doc.push_if(LineStyle::Subtitle, &exp.company);
            doc.push_if(
                LineStyle::Date,
                &date_range(&exp.start_date, &exp.end_date, exp.current),
            );
            doc.push_if(LineStyle::Subtitle, &exp.location);
            doc.push_if(LineStyle::Body, &exp.description);
        }
    }

    if !resume.education.is_empty() {
        doc.heading("Education");
        for (i, edu) in resume.education.iter().enumerate() {
            if i > 0 {
                doc.blank();
            }
            doc.push(LineStyle::Title, edu.degree.as_str());
            doc.push_if(LineStyle::Subtitle, &edu.institution);
            doc.push_if(
                LineStyle::Date,
                &date_range(&edu.start_date, &edu.end_date, edu.current),
            );
            doc.push_if(LineStyle::Subtitle, &edu.location);
            if !edu.gpa.is_empty() {
                doc.push(LineStyle::Subtitle, format!("GPA: {}", edu.gpa));
            }
            doc.push_if(LineStyle::Body, &edu.description);
        }
    }

    if !resume.projects.is_empty() {
        doc.heading("Projects");
        for (i, project) in resume.projects.iter().enumerate() {
            if i > 0 {
                doc.blank();
            }
            doc.push(LineStyle::Title, project.name.as_str());
            doc.push_if(LineStyle::Subtitle, &project.technologies);
            if !project.start_date.is_empty()
                && (!project.end_date.is_empty() || project.current)
            {
                doc.push(
                    LineStyle::Date,
                    date_range(&project.start_date, &project.end_date, project.current),
                );
            }
            doc.push_if(LineStyle::Body, &project.description);
            if !project.url.is_empty() {
                doc.push(LineStyle::Subtitle, format!("Live: {}", project.url));
            }
            if !project.github.is_empty() {
                doc.push(LineStyle::Subtitle, format!("Source: {}", project.github));
            }
        }
    }

    if !resume.certifications.is_empty() {
        doc.heading("Certifications");
        for (i, cert) in resume.certifications.iter().enumerate() {
            if i > 0 {
                doc.blank();
            }
            doc.push(LineStyle::Title, cert.name.as_str());
            doc.push_if(LineStyle::Subtitle, &cert.issuer);
            let mut dates = format!("Issued: {}", format_month(&cert.issue_date));
            if !cert.expiry_date.is_empty() {
                dates.push_str(&format!(" • Expires: {}", format_month(&cert.expiry_date)));
            }
            doc.push(LineStyle::Date, dates);
            if !cert.credential_id.is_empty() {
                doc.push(
                    LineStyle::Subtitle,
                    format!("Credential ID: {}", cert.credential_id),
                );
            }
            if !cert.url.is_empty() {
                doc.push(LineStyle::Subtitle, format!("Verify: {}", cert.url));
            }
        }
    }

    Some(doc)
}

fn header(doc: &mut Document, info: &PersonalInfo) {
    doc.push_if(LineStyle::Name, &info.full_name());
    doc.push_if(LineStyle::Contact, &info.email);
    doc.push_if(LineStyle::Contact, &info.phone);
    doc.push_if(LineStyle::Contact, &info.location);

    let links: Vec<String> = [
        ("LinkedIn", &info.linkedin),
        ("GitHub", &info.github),
        ("Website", &info.website),
    ]
    .iter()
    .filter(|(_, url)| !url.is_empty())
    .map(|(label, url)| format!("{}: {}", label, url))
    .collect();
    if !links.is_empty() {
        doc.push(LineStyle::Contact, links.join(" | "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Certification, Experience, Project};

    #[test]
    fn test_empty_state() {
        let resume = ResumeData::default();
        assert!(!has_data(&resume));
        assert!(build(&resume).is_none());

        // 电话与简介不影响空状态判断
        let mut resume = ResumeData::default();
        resume.personal_info.phone = "555".to_string();
        resume.personal_info.summary = "hi".to_string();
        assert!(!has_data(&resume));
    }

    #[test]
    fn test_single_field_flips_state() {
        let mut resume = ResumeData::default();
        resume.personal_info.last_name = "Doe".to_string();
        assert!(has_data(&resume));

        let resume = ResumeData {
            certifications: vec![Certification::default()],
            ..ResumeData::default()
        };
        assert!(has_data(&resume));
    }

    #[test]
    fn test_experience_rendering() {
        let resume = ResumeData {
            experience: vec![Experience {
                id: "x".to_string(),
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                start_date: "2020-01".to_string(),
                current: true,
                description: "Built things".to_string(),
                ..Experience::default()
            }],
            ..ResumeData::default()
        };
        let doc = build(&resume).unwrap();

        assert!(doc.contains("Professional Experience"));
        assert!(doc.contains("Engineer"));
        assert!(doc.contains("Acme"));
        assert!(doc.contains("January 2020 - Present"));
        assert!(doc.contains("Built things"));
    }

    #[test]
    fn test_format_month() {
        assert_eq!(format_month("2021-11"), "November 2021");
        assert_eq!(format_month("someday"), "someday");
        assert_eq!(format_month(""), "");
        assert_eq!(date_range("2019-03", "2020-04", false), "March 2019 - April 2020");
        assert_eq!(date_range("2019-03", "", false), "March 2019");
    }

    #[test]
    fn test_project_dates_need_end_or_current() {
        let project = Project {
            name: "Site".to_string(),
            start_date: "2022-02".to_string(),
            ..Project::default()
        };
        let resume = ResumeData {
            projects: vec![project.clone()],
            ..ResumeData::default()
        };
        assert!(!build(&resume).unwrap().contains("February 2022"));

        let resume = ResumeData {
            projects: vec![Project {
                current: true,
                ..project
            }],
            ..ResumeData::default()
        };
        assert!(build(&resume).unwrap().contains("February 2022 - Present"));
    }

    #[test]
    fn test_wrap_words() {
        assert_eq!(wrap_words("aa bb cc", 5), vec!["aa bb", "cc"]);
        assert_eq!(wrap_words("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_words("one\ntwo", 20), vec!["one", "two"]);
        assert_eq!(wrap_words("", 10), vec![""]);
        // 全角字符按两列计
        assert_eq!(wrap_words("张三李四王五", 4), vec!["张三", "李四", "王五"]);
        assert_eq!(wrap_words("张三 Li", 6), vec!["张三", "Li"]);
    }

    #[test]
    fn test_plain_text() {
        let mut resume = ResumeData::default();
        resume.personal_info.first_name = "Ada".to_string();
        resume.personal_info.last_name = "Lovelace".to_string();
        resume.personal_info.summary = "Analyst".to_string();
        let text = build(&resume).unwrap().to_plain_text(20);

        assert!(text.starts_with("    ADA LOVELACE\n"));
        assert!(text.contains("PROFESSIONAL SUMMARY\n"));
        assert!(text.contains("Analyst\n"));
    }
}
