//! App 状态定义 (Model)
//!
//! 包含应用状态结构体及相关枚举

use crate::config::Config;
use crate::editor::{DraftForm, SectionEditor};
use crate::export::Exporter;
use crate::models::{
    Certification, Education, Experience, ItemSummary, PersonalField, PersonalInfo, Project,
    ResumeData, SectionItem,
};

/// 应用状态
pub struct App {
    pub resume: ResumeData,
    pub editors: Editors,
    pub tab: Tab,
    pub selected_index: usize, // 列表分区中的选中项
    pub personal_index: usize, // 个人信息中的选中字段
    pub mode: AppMode,
    pub input_buffer: String,
    pub message: Option<String>,
    pub alert: Option<String>, // 阻塞式提示，需手动关闭
    pub preview_scroll: u16,
    pub exporter: Exporter,
    pub print_command: Vec<String>,
}

/// 标签页
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Personal,
    Experience,
    Education,
    Projects,
    Certifications,
    Preview,
}

/// 列表分区
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Experience,
    Education,
    Projects,
    Certifications,
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    EditingField(PersonalField), // 编辑个人信息的单个字段
    EditingItem(Section),        // 列表条目表单
    Confirm(ConfirmAction),
}

/// 确认操作类型
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    Delete(Section, String),
}

/// 四个列表分区的编辑器
#[derive(Debug, Default)]
pub struct Editors {
    pub experience: SectionEditor<Experience>,
    pub education: SectionEditor<Education>,
    pub projects: SectionEditor<Project>,
    pub certifications: SectionEditor<Certification>,
}

/// 条目类型到其编辑器的映射
pub trait EditorSlot: SectionItem {
    fn editor(editors: &mut Editors) -> &mut SectionEditor<Self>;
}

impl EditorSlot for Experience {
    fn editor(editors: &mut Editors) -> &mut SectionEditor<Self> {
        &mut editors.experience
    }
}

impl EditorSlot for Education {
    fn editor(editors: &mut Editors) -> &mut SectionEditor<Self> {
        &mut editors.education
    }
}

impl EditorSlot for Project {
    fn editor(editors: &mut Editors) -> &mut SectionEditor<Self> {
        &mut editors.projects
    }
}

impl EditorSlot for Certification {
    fn editor(editors: &mut Editors) -> &mut SectionEditor<Self> {
        &mut editors.certifications
    }
}

impl Editors {
    pub fn form(&self, section: Section) -> &dyn DraftForm {
        match section {
            Section::Experience => &self.experience,
            Section::Education => &self.education,
            Section::Projects => &self.projects,
            Section::Certifications => &self.certifications,
        }
    }

    pub fn form_mut(&mut self, section: Section) -> &mut dyn DraftForm {
        match section {
            Section::Experience => &mut self.experience,
            Section::Education => &mut self.education,
            Section::Projects => &mut self.projects,
            Section::Certifications => &mut self.certifications,
        }
    }
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Personal,
        Tab::Experience,
        Tab::Education,
        Tab::Projects,
        Tab::Certifications,
        Tab::Preview,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Personal => "个人信息",
            Tab::Experience => "工作经历",
            Tab::Education => "教育经历",
            Tab::Projects => "项目",
            Tab::Certifications => "证书",
            Tab::Preview => "预览",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Tab> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn section(self) -> Option<Section> {
        match self {
            Tab::Experience => Some(Section::Experience),
            Tab::Education => Some(Section::Education),
            Tab::Projects => Some(Section::Projects),
            Tab::Certifications => Some(Section::Certifications),
            Tab::Personal | Tab::Preview => None,
        }
    }
}

impl Section {
    pub fn noun(self) -> &'static str {
        match self {
            Section::Experience => Experience::NOUN,
            Section::Education => Education::NOUN,
            Section::Projects => Project::NOUN,
            Section::Certifications => Certification::NOUN,
        }
    }
}

fn summaries_of<T: SectionItem>(items: &[T]) -> Vec<(String, ItemSummary)> {
    items
        .iter()
        .map(|item| (item.id().to_string(), item.summary()))
        .collect()
}

impl App {
    /// 创建新的应用实例
    pub fn new(resume: ResumeData, config: &Config) -> Self {
        Self {
            resume,
            editors: Editors::default(),
            tab: Tab::Personal,
            selected_index: 0,
            personal_index: 0,
            mode: AppMode::Normal,
            input_buffer: String::new(),
            message: None,
            alert: None,
            preview_scroll: 0,
            exporter: Exporter::new(config.export.clone()),
            print_command: config.print.command.clone(),
        }
    }

    /// 分区中各条目的 (ID, 摘要)
    pub fn summaries(&self, section: Section) -> Vec<(String, ItemSummary)> {
        match section {
            Section::Experience => summaries_of(&self.resume.experience),
            Section::Education => summaries_of(&self.resume.education),
            Section::Projects => summaries_of(&self.resume.projects),
            Section::Certifications => summaries_of(&self.resume.certifications),
        }
    }

    pub fn section_len(&self, section: Section) -> usize {
        match section {
            Section::Experience => self.resume.experience.len(),
            Section::Education => self.resume.education.len(),
            Section::Projects => self.resume.projects.len(),
            Section::Certifications => self.resume.certifications.len(),
        }
    }

    /// 获取当前选中条目的 ID
    pub fn selected_item_id(&self) -> Option<String> {
        let section = self.tab.section()?;
        self.summaries(section)
            .into_iter()
            .nth(self.selected_index)
            .map(|(id, _)| id)
    }

    pub fn selected_personal_field(&self) -> PersonalField {
        PersonalInfo::FIELDS[self.personal_index.min(PersonalInfo::FIELDS.len() - 1)].field
    }

    /// 删除后确保选中索引有效
    pub fn clamp_selection(&mut self) {
        let len = self.tab.section().map_or(0, |s| self.section_len(s));
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }
}
