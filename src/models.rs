use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use uuid::Uuid;

/// 列表项 ID 长度（十六进制字符）
const ID_LEN: usize = 8;

/// 字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    Month, // YYYY-MM
    Flag,
}

/// 表单字段描述
///
/// `required` 参与保存校验；`marked` 只决定表单上是否显示 `*`
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec<F> {
    pub field: F,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub marked: bool,
}

impl<F> FieldSpec<F> {
    pub const fn new(field: F, label: &'static str, kind: FieldKind, required: bool) -> Self {
        Self {
            field,
            label,
            kind,
            required,
            marked: required,
        }
    }

    /// 标 `*` 但不校验
    pub const fn advisory(field: F, label: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            label,
            kind,
            required: false,
            marked: true,
        }
    }
}

/// 列表视图中一项的摘要
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemSummary {
    pub title: String,
    pub subtitle: String,
    pub detail: String,
}

/// 解析 `YYYY-MM` 形式的月份
pub fn parse_month(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d").ok()
}

/// 生成在 `existing` 中不存在的短 ID
pub fn generate_id<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = existing.into_iter().collect();
    loop {
        let id = Uuid::new_v4().simple().to_string()[..ID_LEN].to_string();
        if !taken.contains(id.as_str()) {
            return id;
        }
    }
}

/// 可在分区编辑器中增删改的列表项
pub trait SectionItem: Clone + fmt::Debug {
    type Field: Copy + PartialEq + fmt::Debug + 'static;

    const FIELDS: &'static [FieldSpec<Self::Field>];
    /// 用于提示信息的名称
    const NOUN: &'static str;

    fn with_id(id: String) -> Self;
    fn id(&self) -> &str;

    fn text(&self, field: Self::Field) -> Option<&str>;
    fn text_mut(&mut self, field: Self::Field) -> Option<&mut String>;

    fn flag(&self, _field: Self::Field) -> Option<bool> {
        None
    }

    fn flag_mut(&mut self, _field: Self::Field) -> Option<&mut bool> {
        None
    }

    /// 当前状态下该字段是否不可编辑
    fn is_disabled(&self, _field: Self::Field) -> bool {
        false
    }

    /// 保存前的规范化
    fn normalize(&mut self) {}

    fn summary(&self) -> ItemSummary;

    fn section(resume: &ResumeData) -> &[Self];
    fn into_update(items: Vec<Self>) -> SectionUpdate;

    /// 表单中显示的值
    fn display_value(&self, field: Self::Field) -> String {
        match self.flag(field) {
            Some(true) => "[x]".to_string(),
            Some(false) => "[ ]".to_string(),
            None => self.text(field).unwrap_or_default().to_string(),
        }
    }
}

fn date_span(start: &str, end: &str, current: bool) -> String {
    let end = if current { "Present" } else { end };
    match (start.is_empty(), end.is_empty()) {
        (true, true) => String::new(),
        (false, true) => start.to_string(),
        _ => format!("{} - {}", start, end),
    }
}

// ============ 个人信息 ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonalField {
    FirstName,
    LastName,
    Email,
    Phone,
    Location,
    Linkedin,
    Github,
    Website,
    Summary,
}

/// 个人信息（单例）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub website: String,
    pub summary: String,
}

impl PersonalInfo {
    pub const FIELDS: &'static [FieldSpec<PersonalField>] = &[
        FieldSpec::new(PersonalField::FirstName, "名", FieldKind::Text, true),
        FieldSpec::new(PersonalField::LastName, "姓", FieldKind::Text, true),
        FieldSpec::new(PersonalField::Email, "邮箱", FieldKind::Text, true),
        FieldSpec::new(PersonalField::Phone, "电话", FieldKind::Text, true),
        FieldSpec::advisory(PersonalField::Location, "所在地", FieldKind::Text),
        FieldSpec::new(PersonalField::Linkedin, "LinkedIn", FieldKind::Text, false),
        FieldSpec::new(PersonalField::Github, "GitHub", FieldKind::Text, false),
        FieldSpec::new(PersonalField::Website, "个人网站", FieldKind::Text, false),
        FieldSpec::advisory(PersonalField::Summary, "个人简介", FieldKind::Multiline),
    ];

    pub fn field_spec(field: PersonalField) -> Option<&'static FieldSpec<PersonalField>> {
        Self::FIELDS.iter().find(|spec| spec.field == field)
    }

    pub fn text(&self, field: PersonalField) -> &str {
        match field {
            PersonalField::FirstName => &self.first_name,
            PersonalField::LastName => &self.last_name,
            PersonalField::Email => &self.email,
            PersonalField::Phone => &self.phone,
            PersonalField::Location => &self.location,
            PersonalField::Linkedin => &self.linkedin,
            PersonalField::Github => &self.github,
            PersonalField::Website => &self.website,
            PersonalField::Summary => &self.summary,
        }
    }

    /// 返回替换了单个字段的新记录
    pub fn with_field(&self, field: PersonalField, value: String) -> Self {
        let mut next = self.clone();
        let slot = match field {
            PersonalField::FirstName => &mut next.first_name,
            PersonalField::LastName => &mut next.last_name,
            PersonalField::Email => &mut next.email,
            PersonalField::Phone => &mut next.phone,
            PersonalField::Location => &mut next.location,
            PersonalField::Linkedin => &mut next.linkedin,
            PersonalField::Github => &mut next.github,
            PersonalField::Website => &mut next.website,
            PersonalField::Summary => &mut next.summary,
        };
        *slot = value;
        next
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

// ============ 工作经历 ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceField {
    Title,
    Company,
    Location,
    StartDate,
    EndDate,
    Current,
    Description,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Experience {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
}

impl SectionItem for Experience {
    type Field = ExperienceField;

    const FIELDS: &'static [FieldSpec<ExperienceField>] = &[
        FieldSpec::new(ExperienceField::Title, "职位", FieldKind::Text, true),
        FieldSpec::new(ExperienceField::Company, "公司", FieldKind::Text, true),
        FieldSpec::new(ExperienceField::Location, "地点", FieldKind::Text, false),
        FieldSpec::new(ExperienceField::StartDate, "开始日期", FieldKind::Month, true),
        FieldSpec::new(ExperienceField::EndDate, "结束日期", FieldKind::Month, false),
        FieldSpec::new(ExperienceField::Current, "目前在职", FieldKind::Flag, false),
        FieldSpec::advisory(ExperienceField::Description, "工作描述", FieldKind::Multiline),
    ];
    const NOUN: &'static str = "工作经历";

    fn with_id(id: String) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self, field: ExperienceField) -> Option<&str> {
        match field {
            ExperienceField::Title => Some(&self.title),
            ExperienceField::Company => Some(&self.company),
            ExperienceField::Location => Some(&self.location),
            ExperienceField::StartDate => Some(&self.start_date),
            ExperienceField::EndDate => Some(&self.end_date),
            ExperienceField::Description => Some(&self.description),
            ExperienceField::Current => None,
        }
    }

    fn text_mut(&mut self, field: ExperienceField) -> Option<&mut String> {
        match field {
            ExperienceField::Title => Some(&mut self.title),
            ExperienceField::Company => Some(&mut self.company),
            ExperienceField::Location => Some(&mut self.location),
            ExperienceField::StartDate => Some(&mut self.start_date),
            ExperienceField::EndDate => Some(&mut self.end_date),
            ExperienceField::Description => Some(&mut self.description),
            ExperienceField::Current => None,
        }
    }

    fn flag(&self, field: ExperienceField) -> Option<bool> {
        (field == ExperienceField::Current).then_some(self.current)
    }

    fn flag_mut(&mut self, field: ExperienceField) -> Option<&mut bool> {
        (field == ExperienceField::Current).then_some(&mut self.current)
    }

    fn is_disabled(&self, field: ExperienceField) -> bool {
        field == ExperienceField::EndDate && self.current
    }

    fn normalize(&mut self) {
        if self.current {
            self.end_date.clear();
        }
    }

    fn summary(&self) -> ItemSummary {
        let mut detail = date_span(&self.start_date, &self.end_date, self.current);
        if !self.location.is_empty() {
            detail = format!("{} • {}", detail, self.location);
        }
        ItemSummary {
            title: self.title.clone(),
            subtitle: self.company.clone(),
            detail,
        }
    }

    fn section(resume: &ResumeData) -> &[Self] {
        &resume.experience
    }

    fn into_update(items: Vec<Self>) -> SectionUpdate {
        SectionUpdate::Experience(items)
    }
}

// ============ 教育经历 ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EducationField {
    Degree,
    Institution,
    Location,
    StartDate,
    EndDate,
    Current,
    Gpa,
    Description,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Education {
    pub id: String,
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub gpa: String,
    pub description: String,
}

impl SectionItem for Education {
    type Field = EducationField;

    const FIELDS: &'static [FieldSpec<EducationField>] = &[
        FieldSpec::new(EducationField::Degree, "学位", FieldKind::Text, true),
        FieldSpec::new(EducationField::Institution, "学校", FieldKind::Text, true),
        FieldSpec::new(EducationField::Location, "地点", FieldKind::Text, false),
        FieldSpec::new(EducationField::StartDate, "开始日期", FieldKind::Month, true),
        FieldSpec::new(EducationField::EndDate, "结束日期", FieldKind::Month, false),
        FieldSpec::new(EducationField::Current, "目前在读", FieldKind::Flag, false),
        FieldSpec::new(EducationField::Gpa, "GPA", FieldKind::Text, false),
        FieldSpec::new(EducationField::Description, "描述", FieldKind::Multiline, false),
    ];
    const NOUN: &'static str = "教育经历";

    fn with_id(id: String) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self, field: EducationField) -> Option<&str> {
        match field {
            EducationField::Degree => Some(&self.degree),
            EducationField::Institution => Some(&self.institution),
            EducationField::Location => Some(&self.location),
            EducationField::StartDate => Some(&self.start_date),
            EducationField::EndDate => Some(&self.end_date),
            EducationField::Gpa => Some(&self.gpa),
            EducationField::Description => Some(&self.description),
            EducationField::Current => None,
        }
    }

    fn text_mut(&mut self, field: EducationField) -> Option<&mut String> {
        match field {
            EducationField::Degree => Some(&mut self.degree),
            EducationField::Institution => Some(&mut self.institution),
            EducationField::Location => Some(&mut self.location),
            EducationField::StartDate => Some(&mut self.start_date),
            EducationField::EndDate => Some(&mut self.end_date),
            EducationField::Gpa => Some(&mut self.gpa),
            EducationField::Description => Some(&mut self.description),
            EducationField::Current => None,
        }
    }

    fn flag(&self, field: EducationField) -> Option<bool> {
        (field == EducationField::Current).then_some(self.current)
    }

    fn flag_mut(&mut self, field: EducationField) -> Option<&mut bool> {
        (field == EducationField::Current).then_some(&mut self.current)
    }

    fn is_disabled(&self, field: EducationField) -> bool {
        field == EducationField::EndDate && self.current
    }

    fn normalize(&mut self) {
        if self.current {
            self.end_date.clear();
        }
    }

    fn summary(&self) -> ItemSummary {
        let mut detail = date_span(&self.start_date, &self.end_date, self.current);
        if !self.gpa.is_empty() {
            detail = format!("{} • GPA: {}", detail, self.gpa);
        }
        ItemSummary {
            title: self.degree.clone(),
            subtitle: self.institution.clone(),
            detail,
        }
    }

    fn section(resume: &ResumeData) -> &[Self] {
        &resume.education
    }

    fn into_update(items: Vec<Self>) -> SectionUpdate {
        SectionUpdate::Education(items)
    }
}

// ============ 项目经历 ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectField {
    Name,
    Description,
    Technologies,
    Url,
    Github,
    StartDate,
    EndDate,
    Current,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub technologies: String,
    pub url: String,
    pub github: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
}

impl SectionItem for Project {
    type Field = ProjectField;

    const FIELDS: &'static [FieldSpec<ProjectField>] = &[
        FieldSpec::new(ProjectField::Name, "项目名称", FieldKind::Text, true),
        FieldSpec::new(ProjectField::Description, "项目描述", FieldKind::Multiline, true),
        FieldSpec::new(ProjectField::Technologies, "技术栈", FieldKind::Text, true),
        FieldSpec::new(ProjectField::Url, "在线地址", FieldKind::Text, false),
        FieldSpec::new(ProjectField::Github, "GitHub 仓库", FieldKind::Text, false),
        FieldSpec::new(ProjectField::StartDate, "开始日期", FieldKind::Month, false),
        FieldSpec::new(ProjectField::EndDate, "结束日期", FieldKind::Month, false),
        FieldSpec::new(ProjectField::Current, "进行中", FieldKind::Flag, false),
    ];
    const NOUN: &'static str = "项目";

    fn with_id(id: String) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self, field: ProjectField) -> Option<&str> {
        match field {
            ProjectField::Name => Some(&self.name),
            ProjectField::Description => Some(&self.description),
            ProjectField::Technologies => Some(&self.technologies),
            ProjectField::Url => Some(&self.url),
            ProjectField::Github => Some(&self.github),
            ProjectField::StartDate => Some(&self.start_date),
            ProjectField::EndDate => Some(&self.end_date),
            ProjectField::Current => None,
        }
    }

    fn text_mut(&mut self, field: ProjectField) -> Option<&mut String> {
        match field {
            ProjectField::Name => Some(&mut self.name),
            ProjectField::Description => Some(&mut self.description),
            ProjectField::Technologies => Some(&mut self.technologies),
            ProjectField::Url => Some(&mut self.url),
            ProjectField::Github => Some(&mut self.github),
            ProjectField::StartDate => Some(&mut self.start_date),
            ProjectField::EndDate => Some(&mut self.end_date),
            ProjectField::Current => None,
        }
    }

    fn flag(&self, field: ProjectField) -> Option<bool> {
        (field == ProjectField::Current).then_some(self.current)
    }

    fn flag_mut(&mut self, field: ProjectField) -> Option<&mut bool> {
        (field == ProjectField::Current).then_some(&mut self.current)
    }

    fn is_disabled(&self, field: ProjectField) -> bool {
        field == ProjectField::EndDate && self.current
    }

    fn normalize(&mut self) {
        if self.current {
            self.end_date.clear();
        }
    }

    fn summary(&self) -> ItemSummary {
        ItemSummary {
            title: self.name.clone(),
            subtitle: self.technologies.clone(),
            detail: date_span(&self.start_date, &self.end_date, self.current),
        }
    }

    fn section(resume: &ResumeData) -> &[Self] {
        &resume.projects
    }

    fn into_update(items: Vec<Self>) -> SectionUpdate {
        SectionUpdate::Projects(items)
    }
}

// ============ 证书 ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificationField {
    Name,
    Issuer,
    IssueDate,
    ExpiryDate,
    CredentialId,
    Url,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Certification {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub issue_date: String,
    pub expiry_date: String,
    pub credential_id: String,
    pub url: String,
}

impl SectionItem for Certification {
    type Field = CertificationField;

    const FIELDS: &'static [FieldSpec<CertificationField>] = &[
        FieldSpec::new(CertificationField::Name, "证书名称", FieldKind::Text, true),
        FieldSpec::new(CertificationField::Issuer, "颁发机构", FieldKind::Text, true),
        FieldSpec::new(CertificationField::IssueDate, "颁发日期", FieldKind::Month, true),
        FieldSpec::new(CertificationField::ExpiryDate, "到期日期", FieldKind::Month, false),
        FieldSpec::new(CertificationField::CredentialId, "证书编号", FieldKind::Text, false),
        FieldSpec::new(CertificationField::Url, "验证地址", FieldKind::Text, false),
    ];
    const NOUN: &'static str = "证书";

    fn with_id(id: String) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self, field: CertificationField) -> Option<&str> {
        Some(match field {
            CertificationField::Name => &self.name,
            CertificationField::Issuer => &self.issuer,
            CertificationField::IssueDate => &self.issue_date,
            CertificationField::ExpiryDate => &self.expiry_date,
            CertificationField::CredentialId => &self.credential_id,
            CertificationField::Url => &self.url,
        })
    }

    fn text_mut(&mut self, field: CertificationField) -> Option<&mut String> {
        Some(match field {
            CertificationField::Name => &mut self.name,
            CertificationField::Issuer => &mut self.issuer,
            CertificationField::IssueDate => &mut self.issue_date,
            CertificationField::ExpiryDate => &mut self.expiry_date,
            CertificationField::CredentialId => &mut self.credential_id,
            CertificationField::Url => &mut self.url,
        })
    }

    fn summary(&self) -> ItemSummary {
        let mut detail = format!("Issued: {}", self.issue_date);
        if !self.expiry_date.is_empty() {
            detail.push_str(&format!(" • Expires: {}", self.expiry_date));
        }
        if !self.credential_id.is_empty() {
            detail.push_str(&format!(" • ID: {}", self.credential_id));
        }
        ItemSummary {
            title: self.name.clone(),
            subtitle: self.issuer.clone(),
            detail,
        }
    }

    fn section(resume: &ResumeData) -> &[Self] {
        &resume.certifications
    }

    fn into_update(items: Vec<Self>) -> SectionUpdate {
        SectionUpdate::Certifications(items)
    }
}

// ============ 聚合文档 ============

/// 整份简历，由 App 独占持有
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
}

/// 单个分区的整体替换
#[derive(Debug, Clone, PartialEq)]
pub enum SectionUpdate {
    PersonalInfo(PersonalInfo),
    Experience(Vec<Experience>),
    Education(Vec<Education>),
    Projects(Vec<Project>),
    Certifications(Vec<Certification>),
}

impl ResumeData {
    /// 合并一个分区，返回新的文档
    pub fn merge(&self, update: SectionUpdate) -> Self {
        match update {
            SectionUpdate::PersonalInfo(personal_info) => Self {
                personal_info,
                ..self.clone()
            },
            SectionUpdate::Experience(experience) => Self {
                experience,
                ..self.clone()
            },
            SectionUpdate::Education(education) => Self {
                education,
                ..self.clone()
            },
            SectionUpdate::Projects(projects) => Self {
                projects,
                ..self.clone()
            },
            SectionUpdate::Certifications(certifications) => Self {
                certifications,
                ..self.clone()
            },
        }
    }
}
