//! 网页正文提取 - 业务能力层
//!
//! 只负责"URL → 摘录文本"能力
//!
//! 选择策略：
//! 1. 优先取语义内容容器（`article` / `.content` / `.post-content` / `.entry-content`）
//! 2. 一个都没有时，按文档顺序拼接 `h1-h3`、`p`、`li` 的文本
//!
//! 片段以换行连接，最后按字符数截断。脚本、样式等不可见标签中的文本不计入。

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::clients::PageFetcher;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::PageExcerpt;

static CONTENT_CONTAINERS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("article, .content, .post-content, .entry-content")
        .expect("content container selector is valid CSS")
});

static FALLBACK_BLOCKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, p, li").expect("fallback block selector is valid CSS")
});

/// 不参与正文的标签
const SKIPPED_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// 网页正文提取服务
pub struct ContentExtractor {
    fetcher: PageFetcher,
    max_chars: usize,
}

impl ContentExtractor {
    /// 创建新的提取服务
    pub fn new(config: &Config) -> Self {
        Self {
            fetcher: PageFetcher::new(config),
            max_chars: config.max_page_chars,
        }
    }

    /// 抓取网页并提取摘录
    pub async fn extract(&self, url: &str) -> AppResult<PageExcerpt> {
        let html = self.fetcher.fetch_html(url).await?;
        let excerpt = extract_text(&html, self.max_chars);
        info!("📄 提取完成: {} ({} 字符)", url, excerpt.char_len());
        Ok(excerpt)
    }
}

/// 从 HTML 中提取正文摘录
///
/// # 参数
/// - `html`: 网页源码
/// - `max_chars`: 最大字符数
pub fn extract_text(html: &str, max_chars: usize) -> PageExcerpt {
    let document = Html::parse_document(html);

    let containers: Vec<ElementRef> = document.select(&CONTENT_CONTAINERS).collect();

    let fragments: Vec<String> = if containers.is_empty() {
        debug!("未找到内容容器，回退到标题/段落/列表项");
        document
            .select(&FALLBACK_BLOCKS)
            .map(|el| joined_text(el, " "))
            .filter(|text| !text.is_empty())
            .collect()
    } else {
        debug!("找到 {} 个内容容器", containers.len());
        containers
            .into_iter()
            .map(|el| joined_text(el, "\n"))
            .collect()
    };

    PageExcerpt::new(fragments.join("\n"), max_chars)
}

/// 拼接元素下所有可见文本节点（逐个去除首尾空白，丢弃空节点）
fn joined_text(element: ElementRef, separator: &str) -> String {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| SKIPPED_TAGS.contains(&el.name()))
            });
            (!hidden).then_some(&**text)
        })
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
