mod short_link;

pub use short_link::{
    sort_newest_first, CreateShortLinkDto, LinkStats, ShortLink, ShortLinkView, UpdateShortLinkDto,
};
