//! Passive reply rendering

use wecom_message::xml::flatten;
use wecom_message::{
    Article, ArticleCollection, Message, MessageError, MessageParser, MusicPayload, Payload,
    ReplyBuilder,
};

fn inbound() -> Message {
    MessageParser::parse(
        b"<xml><ToUserName><![CDATA[wx1]]></ToUserName>\
          <FromUserName><![CDATA[zhangsan]]></FromUserName>\
          <CreateTime>1409659813</CreateTime><MsgType><![CDATA[text]]></MsgType>\
          <Content><![CDATA[ping]]></Content><MsgId>1</MsgId></xml>",
    )
    .expect("inbound parses")
}

fn render(payload: Payload) -> String {
    let message = inbound();
    ReplyBuilder::new(&message)
        .payload(payload)
        .expect("payload is complete")
        .at(1_500_000_000)
        .render()
        .expect("reply renders")
}

#[test]
fn test_text_reply_swaps_addressing() {
    let xml = render(Payload::text("pong"));
    assert_eq!(
        xml,
        "<xml><ToUserName><![CDATA[zhangsan]]></ToUserName>\
         <FromUserName><![CDATA[wx1]]></FromUserName>\
         <CreateTime>1500000000</CreateTime>\
         <MsgType><![CDATA[text]]></MsgType>\
         <Content><![CDATA[pong]]></Content></xml>"
    );
}

#[test]
fn test_reply_parses_back() {
    let xml = render(Payload::text("pong"));
    let reply = MessageParser::parse(xml.as_bytes()).expect("reply is well formed");
    assert_eq!(reply.to_id, "zhangsan");
    assert_eq!(reply.from_id, "wx1");
    assert_eq!(reply.content(), Some("pong"));
}

#[test]
fn test_fresh_create_time() {
    let message = inbound();
    let xml = ReplyBuilder::new(&message)
        .text("pong")
        .expect("text is set")
        .render()
        .expect("reply renders");
    let fields = flatten(xml.as_bytes()).expect("well formed");
    let create_time: i64 = fields
        .number("CreateTime")
        .expect("numeric")
        .expect("present");
    assert!(create_time > message.create_time);
}

#[test]
fn test_media_replies() {
    let image = render(Payload::image("m1"));
    assert!(image.contains("<MsgType><![CDATA[image]]></MsgType>"));
    assert!(image.contains("<Image><MediaId><![CDATA[m1]]></MediaId></Image>"));

    let voice = render(Payload::voice("m2"));
    assert!(voice.contains("<Voice><MediaId><![CDATA[m2]]></MediaId></Voice>"));

    let file = render(Payload::file("m3"));
    assert!(file.contains("<MsgType><![CDATA[file]]></MsgType>"));
    assert!(file.contains("<File><MediaId><![CDATA[m3]]></MediaId></File>"));
}

#[test]
fn test_video_reply_optional_fields() {
    let bare = render(Payload::video("v1", None, None));
    assert!(bare.contains("<Video><MediaId><![CDATA[v1]]></MediaId></Video>"));

    let captioned = render(Payload::video(
        "v1",
        Some("title".into()),
        Some("desc".into()),
    ));
    assert!(captioned.contains(
        "<Video><MediaId><![CDATA[v1]]></MediaId><Title><![CDATA[title]]></Title>\
         <Description><![CDATA[desc]]></Description></Video>"
    ));
}

#[test]
fn test_music_reply() {
    let xml = render(Payload::music(MusicPayload {
        title: "song".into(),
        music_url: "http://m/1.mp3".into(),
        ..MusicPayload::default()
    }));
    assert!(xml.contains("<MusicUrl><![CDATA[http://m/1.mp3]]></MusicUrl>"));
    assert!(xml.contains("<HQMusicUrl><![CDATA[]]></HQMusicUrl>"));
    assert!(xml.contains("<Title><![CDATA[song]]></Title>"));
}

#[test]
fn test_news_reply() {
    let articles = ArticleCollection::try_from(vec![
        Article::new("first")
            .with_description("one")
            .with_pic_url("http://p/1")
            .with_url("http://u/1"),
        Article::new("second"),
    ])
    .expect("two articles fit");
    let xml = render(Payload::news(articles));

    assert!(xml.contains("<MsgType><![CDATA[news]]></MsgType>"));
    assert!(xml.contains("<ArticleCount>2</ArticleCount>"));
    assert!(xml.contains(
        "<item><Title><![CDATA[first]]></Title><Description><![CDATA[one]]></Description>\
         <PicUrl><![CDATA[http://p/1]]></PicUrl><Url><![CDATA[http://u/1]]></Url></item>"
    ));
    assert!(xml.contains(
        "<item><Title><![CDATA[second]]></Title><Description><![CDATA[]]></Description>\
         <PicUrl><![CDATA[]]></PicUrl><Url><![CDATA[]]></Url></item>"
    ));
}

#[test]
fn test_cdata_terminator_in_content() {
    let xml = render(Payload::text("a]]>b"));
    let reply = MessageParser::parse(xml.as_bytes()).expect("still well formed");
    assert_eq!(reply.content(), Some("a]]>b"));
}

#[test]
fn test_missing_required_fields() {
    let message = inbound();
    for payload in [
        Payload::text(""),
        Payload::image(""),
        Payload::video("", None, None),
        Payload::music(MusicPayload::default()),
        Payload::news(ArticleCollection::new()),
    ] {
        let err = ReplyBuilder::new(&message).payload(payload).unwrap_err();
        assert!(matches!(err, MessageError::Construction(_)));
    }
}

#[test]
fn test_render_without_payload() {
    let message = inbound();
    let err = ReplyBuilder::new(&message).render().unwrap_err();
    assert!(matches!(err, MessageError::Construction(_)));
}
